// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-time failures: loading or parsing lexicon tables and the
/// vocabulary pack, or starting the line editor. Per-turn processing never
/// produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum DroidError {
    #[error("malformed lemma entry on line {line}: {text:?} (expected base<TAB>inflected)")]
    MalformedLemma { line: usize, text: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

pub type Result<T> = std::result::Result<T, DroidError>;
