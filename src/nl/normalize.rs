//! Text normalization for the order-taking assistant.
//!
//! Pipeline: raw input → segment → tokenize → drop stopwords → stem
//! → lemmatize → tag with lexicon categories.
//!
//! Only the first non-empty segment is carried past segmentation; later
//! sentences of a multi-sentence input never drive the dialogue.
//!
//! Every stage is a pure function over the shared, read-only [`Lexicon`].
//! Nothing here fails: malformed input degrades to an empty token list.

use std::collections::BTreeSet;

use super::lexicon::Lexicon;
use super::stemmer;

/// Characters that end a segment.
const SEGMENT_DELIMITERS: [char; 3] = ['.', '\n', '\t'];

/// Characters that separate tokens inside a segment.
const TOKEN_DELIMITERS: [char; 2] = [' ', ','];

// ---------------------------------------------------------------------------
// TaggedToken / NormalizedInput: the output of normalization
// ---------------------------------------------------------------------------

/// A normalized token with the lexicon categories it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub token: String,
    pub tags: BTreeSet<String>,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            token: token.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Result of normalizing a raw utterance.
#[derive(Debug, Clone)]
pub struct NormalizedInput {
    /// The raw input, untouched.
    pub raw: String,
    /// Every non-empty segment, in order.
    pub segments: Vec<String>,
    /// Tokens of the first segment after stopwords, stemming and lemmas.
    pub tokens: Vec<String>,
    /// `tokens` with their categories.
    pub tagged: Vec<TaggedToken>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a raw utterance through the full pipeline.
pub fn normalize(input: &str, lexicon: &Lexicon) -> NormalizedInput {
    let segments: Vec<String> = segment(input).into_iter().map(String::from).collect();

    let tokens = match segments.first() {
        Some(first) => {
            let tokens = tokenize(first);
            let tokens = remove_stopwords(tokens, lexicon);
            let tokens = stem_tokens(tokens, lexicon);
            lemmatize(tokens, lexicon)
        }
        None => Vec::new(),
    };
    let tagged = tag(&tokens, lexicon);

    tracing::debug!(input, ?tokens, segments = segments.len(), "normalized");

    NormalizedInput {
        raw: input.to_string(),
        segments,
        tokens,
        tagged,
    }
}

/// Split an utterance into sentence-like segments on period, newline and
/// tab. Empty fragments are dropped; whitespace-only ones are kept.
pub fn segment(input: &str) -> Vec<&str> {
    input
        .split(|c| SEGMENT_DELIMITERS.contains(&c))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a segment on spaces and commas. Empty tokens are kept; stopword
/// filtering removes them.
pub fn tokenize(segment: &str) -> Vec<String> {
    segment
        .split(|c| TOKEN_DELIMITERS.contains(&c))
        .map(String::from)
        .collect()
}

/// Drop tokens that exactly match a stopword (trimmed, case-insensitive),
/// unless the token is allow-listed.
pub fn remove_stopwords(tokens: Vec<String>, lexicon: &Lexicon) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| lexicon.is_kept(t) || !lexicon.is_stopword(t))
        .collect()
}

/// Stem every token that is not allow-listed.
pub fn stem_tokens(tokens: Vec<String>, lexicon: &Lexicon) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| if lexicon.is_kept(&t) { t } else { stemmer::stem(&t) })
        .collect()
}

/// Replace tokens with their base form from the lemma table. Allow-listed
/// tokens and tokens missing from the table pass through unchanged.
pub fn lemmatize(tokens: Vec<String>, lexicon: &Lexicon) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| {
            if lexicon.is_kept(&t) {
                return t;
            }
            match lexicon.lemma(&t) {
                Some(base) => base.to_string(),
                None => t,
            }
        })
        .collect()
}

/// Attach every lexicon category whose fragment occurs in the token.
pub fn tag(tokens: &[String], lexicon: &Lexicon) -> Vec<TaggedToken> {
    tokens
        .iter()
        .map(|t| TaggedToken::new(t.clone(), lexicon.categories_for(t)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
