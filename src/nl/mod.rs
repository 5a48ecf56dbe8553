//! Natural-language order taking.
//!
//! A deterministic, rule-based adapter that turns free-text customer
//! utterances into order-list edits and a reply.
//! Pipeline:
//!
//! 1. **Normalization**: segment, tokenize, drop stopwords (`normalize`)
//! 2. **Stemming**: five-step affix stripping (`stemmer`)
//! 3. **Lemmatization + tagging**: lexicon lookups (`lexicon`)
//! 4. **Intent scoring**: five weighted classifiers (`intent`)
//! 5. **Dialogue**: order-taking state machine (`dialogue`)
//!
//! Allow-list, menu, reply templates and scoring options come from the
//! vocabulary pack (`vocab`).

pub mod normalize;
pub mod stemmer;
pub mod lexicon;
pub mod intent;
pub mod dialogue;
pub mod vocab;

use dialogue::{OrderTaker, RandomChooser, Session};

// ---------------------------------------------------------------------------
// DroidResponse: the output of one turn
// ---------------------------------------------------------------------------

/// What the assistant says after one utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum DroidResponse {
    /// First items taken; the session moved to TakingOrder.
    OrderStarted {
        /// Items added this turn.
        items: Vec<String>,
        text: String,
    },
    /// Items appended to the order.
    ItemsAdded { items: Vec<String>, text: String },
    /// Items dropped from the order.
    ItemsRemoved {
        /// Food words named in the utterance, whether or not they were on
        /// the order.
        items: Vec<String>,
        text: String,
    },
    /// The customer agreed to go on; asks what to add.
    AskAddition { text: String },
    /// Upsell offer. `item` is `None` when the menu is empty.
    Suggestion { item: Option<String>, text: String },
    /// Final summary and farewell; the session is now closed.
    OrderComplete {
        /// The full order.
        items: Vec<String>,
        text: String,
    },
    /// The utterance was not understood in the current state.
    Clarify { text: String },
    /// The session was already closed.
    Closed { text: String },
}

impl DroidResponse {
    /// The text to display.
    pub fn text(&self) -> &str {
        match self {
            DroidResponse::OrderStarted { text, .. }
            | DroidResponse::ItemsAdded { text, .. }
            | DroidResponse::ItemsRemoved { text, .. }
            | DroidResponse::AskAddition { text }
            | DroidResponse::Suggestion { text, .. }
            | DroidResponse::OrderComplete { text, .. }
            | DroidResponse::Clarify { text }
            | DroidResponse::Closed { text } => text,
        }
    }
}

impl std::fmt::Display for DroidResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// ---------------------------------------------------------------------------
// Public API: the main entry point
// ---------------------------------------------------------------------------

/// Process one utterance with the default lexicon and vocabulary and random
/// template selection.
pub fn process_input(input: &str, session: &mut Session) -> DroidResponse {
    let mut taker = OrderTaker::new(lexicon::default_lexicon(), vocab::vocab(), RandomChooser::new());
    taker.respond(input, session)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
