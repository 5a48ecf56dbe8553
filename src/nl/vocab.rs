//! Vocabulary pack loader: allow-list, menu, response templates and
//! scoring configuration, all from one YAML file.
//!
//! Uses the standard disk-first + `include_str!` fallback pattern.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::nl::intent::CancelWeights;
use crate::types::Result;

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_VOCAB: &str = include_str!("../../data/nl/droid_vocab.yaml");

const VOCAB_PATH: &str = "data/nl/droid_vocab.yaml";

// ---------------------------------------------------------------------------
// YAML schema types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VocabYaml {
    allow_list: Vec<String>,
    menu: Vec<String>,
    responses: Responses,
    #[serde(default)]
    scoring: ScoringConfig,
}

/// Response template pools. Every turn's output text is drawn from one of
/// these (plus a few fixed phrases in the dialogue controller).
#[derive(Debug, Clone, Deserialize)]
pub struct Responses {
    pub greetings: Vec<String>,
    pub errors: Vec<String>,
    /// May reference `{item}` and `{second}`.
    pub suggestions: Vec<String>,
    pub confirmations: Vec<String>,
    pub farewells: Vec<String>,
}

/// Intent scorer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Starting value for every classifier's product.
    #[serde(default = "default_prior")]
    pub prior: f64,
    /// Which Cancel weight table to use.
    #[serde(default)]
    pub cancel_weights: CancelWeights,
}

fn default_prior() -> f64 {
    1.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            prior: default_prior(),
            cancel_weights: CancelWeights::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime vocabulary: the loaded, indexed form
// ---------------------------------------------------------------------------

/// Loaded vocabulary pack.
#[derive(Debug, Clone)]
pub struct DroidVocab {
    /// Domain words that are never filtered, stemmed or lemmatized.
    /// Stored trimmed and lowercased.
    pub allow_list: HashSet<String>,
    /// Menu items the upsell suggestion picks from, in file order.
    pub menu: Vec<String>,
    pub responses: Responses,
    pub scoring: ScoringConfig,
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static VOCAB: OnceLock<DroidVocab> = OnceLock::new();

/// Get the loaded vocabulary (singleton, loaded on first call).
pub fn vocab() -> &'static DroidVocab {
    VOCAB.get_or_init(load_vocab)
}

/// Parse the vocabulary compiled into the binary.
pub fn embedded() -> DroidVocab {
    parse_vocab(EMBEDDED_VOCAB).expect("embedded droid_vocab.yaml must parse")
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

fn load_vocab() -> DroidVocab {
    let Ok(yaml_str) = std::fs::read_to_string(VOCAB_PATH) else {
        return embedded();
    };

    parse_vocab(&yaml_str).unwrap_or_else(|e| {
        tracing::warn!(path = VOCAB_PATH, error = %e, "failed to parse vocabulary, using embedded");
        embedded()
    })
}

/// Parse a vocabulary pack from YAML text.
pub fn parse_vocab(yaml_str: &str) -> Result<DroidVocab> {
    let raw: VocabYaml = serde_yaml::from_str(yaml_str)?;

    let allow_list = raw
        .allow_list
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    Ok(DroidVocab {
        allow_list,
        menu: raw.menu,
        responses: raw.responses,
        scoring: raw.scoring,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
