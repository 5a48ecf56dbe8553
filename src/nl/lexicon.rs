//! Lexicon tables for the normalization pipeline.
//!
//! Three line-oriented text tables supplied by the lexicon provider:
//!
//! - **stopwords**: one word per line
//! - **lemmas**: `base<TAB>inflected` per line; looked up by inflected form
//! - **word tags**: `Category:` sentinel lines followed by match fragments
//!
//! Tables are parsed once into immutable in-memory maps and shared read-only
//! by every turn. The default lexicon uses the standard disk-first +
//! `include_str!` fallback pattern.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use crate::types::{DroidError, Result};

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_STOPWORDS: &str = include_str!("../../data/lexicon/stop_words_english.txt");
const EMBEDDED_LEMMAS: &str = include_str!("../../data/lexicon/lemmatization-en.txt");
const EMBEDDED_WORD_TAGS: &str = include_str!("../../data/lexicon/word_tags.txt");

/// File names inside a lexicon directory.
pub const STOPWORDS_FILE: &str = "stop_words_english.txt";
pub const LEMMAS_FILE: &str = "lemmatization-en.txt";
pub const WORD_TAGS_FILE: &str = "word_tags.txt";

const DEFAULT_DIR: &str = "data/lexicon";

/// Character that marks a word-tag line as a category sentinel.
const CATEGORY_MARKER: char = ':';

// ---------------------------------------------------------------------------
// Runtime lexicon
// ---------------------------------------------------------------------------

/// One entry of the word-tag table: a token whose lowercased form contains
/// `fragment` carries `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTag {
    pub fragment: String,
    pub category: String,
}

/// The loaded lexicon, indexed for lookup.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Trimmed, lowercased stopwords. Always contains "" and ",".
    pub stopwords: HashSet<String>,
    /// Surface form (lowercase) → base form (lowercase).
    pub lemmas: HashMap<String, String>,
    /// Word-tag table in file order.
    pub word_tags: Vec<WordTag>,
    /// Domain words exempt from stopword filtering, stemming and
    /// lemmatization. Trimmed and lowercased.
    pub keep_words: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from the raw text of the three tables.
    ///
    /// `keep_words` is the allow-list; those words are removed from the
    /// stopword set and exempted from stemming and lemmatization.
    pub fn from_tables<I, S>(
        stopwords: &str,
        lemmas: &str,
        word_tags: &str,
        keep_words: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep_words: HashSet<String> = keep_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let mut stopwords = parse_stopwords(stopwords);
        stopwords.retain(|w| !keep_words.contains(w));

        Ok(Self {
            stopwords,
            lemmas: parse_lemmas(lemmas)?,
            word_tags: parse_word_tags(word_tags),
            keep_words,
        })
    }

    /// Load the three tables from a directory, using the vocabulary
    /// allow-list as keep words.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let stopwords = std::fs::read_to_string(dir.join(STOPWORDS_FILE))?;
        let lemmas = std::fs::read_to_string(dir.join(LEMMAS_FILE))?;
        let word_tags = std::fs::read_to_string(dir.join(WORD_TAGS_FILE))?;

        let lexicon = Self::from_tables(
            &stopwords,
            &lemmas,
            &word_tags,
            &super::vocab::vocab().allow_list,
        )?;
        tracing::debug!(
            dir = %dir.display(),
            stopwords = lexicon.stopwords.len(),
            lemmas = lexicon.lemmas.len(),
            word_tags = lexicon.word_tags.len(),
            "loaded lexicon"
        );
        Ok(lexicon)
    }

    /// The lexicon compiled into the binary.
    pub fn embedded() -> Self {
        Self::from_tables(
            EMBEDDED_STOPWORDS,
            EMBEDDED_LEMMAS,
            EMBEDDED_WORD_TAGS,
            &super::vocab::vocab().allow_list,
        )
        .expect("embedded lexicon tables must parse")
    }

    /// Case-insensitive, whitespace-trimmed allow-list membership.
    pub fn is_kept(&self, word: &str) -> bool {
        self.keep_words.contains(&word.trim().to_lowercase())
    }

    /// Case-insensitive, whitespace-trimmed exact stopword match.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.trim().to_lowercase())
    }

    /// Base form for a surface form, if the lemma table has one.
    pub fn lemma(&self, word: &str) -> Option<&str> {
        self.lemmas
            .get(&word.to_lowercase())
            .map(String::as_str)
            .filter(|base| !base.is_empty())
    }

    /// Every category whose fragment occurs in the token's trimmed,
    /// lowercased form. Duplicates collapse; order follows the table.
    pub fn categories_for(&self, token: &str) -> Vec<&str> {
        let lower = token.trim().to_lowercase();
        let mut found: Vec<&str> = Vec::new();
        for tag in &self.word_tags {
            if lower.contains(tag.fragment.as_str()) && !found.contains(&tag.category.as_str()) {
                found.push(tag.category.as_str());
            }
        }
        found
    }
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static LEXICON: OnceLock<Lexicon> = OnceLock::new();

/// Get the default lexicon (singleton, loaded on first call).
pub fn default_lexicon() -> &'static Lexicon {
    LEXICON.get_or_init(load_default)
}

fn load_default() -> Lexicon {
    if !Path::new(DEFAULT_DIR).is_dir() {
        return Lexicon::embedded();
    }
    Lexicon::load_dir(DEFAULT_DIR).unwrap_or_else(|e| {
        tracing::warn!(dir = DEFAULT_DIR, error = %e, "failed to load lexicon, using embedded");
        Lexicon::embedded()
    })
}

// ---------------------------------------------------------------------------
// Table parsers
// ---------------------------------------------------------------------------

/// Parse the stopword table. Empty tokens and bare commas are always
/// stopwords so tokenization leftovers are dropped.
pub fn parse_stopwords(text: &str) -> HashSet<String> {
    let mut set: HashSet<String> = ["", ","].iter().map(|s| s.to_string()).collect();
    set.extend(text.lines().map(|line| line.trim().to_lowercase()));
    set
}

/// Parse the lemma table: `base<TAB>inflected`, split on the last TAB.
///
/// Blank lines are skipped. A non-blank line without a TAB is a provider
/// contract violation.
pub fn parse_lemmas(text: &str) -> Result<HashMap<String, String>> {
    let mut lemmas = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((base, inflected)) = line.rsplit_once('\t') else {
            return Err(DroidError::MalformedLemma {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        lemmas.insert(inflected.trim().to_lowercase(), base.trim().to_lowercase());
    }
    Ok(lemmas)
}

/// Parse the word-tag table into (fragment, category) entries.
pub fn parse_word_tags(text: &str) -> Vec<WordTag> {
    let mut category = String::new();
    let mut tags = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((name, _)) = line.split_once(CATEGORY_MARKER) {
            category = name.trim().to_lowercase();
            continue;
        }
        tags.push(WordTag {
            fragment: line.trim().to_lowercase(),
            category: category.clone(),
        });
    }
    tags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
