//! Intent scoring over tagged tokens.
//!
//! Intents:
//! - **Order**: the utterance names food
//! - **Cancel**: the customer declines or is done
//! - **Confirm**: the customer accepts
//! - **AddItem**: food plus an add word
//! - **RemoveItem**: food plus a remove word
//!
//! One scorer, five weight tables. For every `(category, weight)` pair the
//! running product is multiplied by `weight * n + SMOOTHING_BIAS`, where `n`
//! is the number of tokens tagged with the category. Scores are only
//! comparable with each other on the same input.

use serde::Deserialize;

use crate::nl::normalize::TaggedToken;
use crate::nl::vocab::ScoringConfig;

/// Keeps an absent category from zeroing a product.
pub const SMOOTHING_BIAS: f64 = 0.001;

// ---------------------------------------------------------------------------
// Intent types
// ---------------------------------------------------------------------------

/// A controller-relevant classification of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Order,
    Cancel,
    Confirm,
    AddItem,
    RemoveItem,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Order,
        Intent::Cancel,
        Intent::Confirm,
        Intent::AddItem,
        Intent::RemoveItem,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Intent::Order => "order",
            Intent::Cancel => "cancel",
            Intent::Confirm => "confirm",
            Intent::AddItem => "add_item",
            Intent::RemoveItem => "remove_item",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

/// `(category, weight)` pairs, applied in order.
pub type WeightTable = &'static [(&'static str, f64)];

pub const ORDER_WEIGHTS: WeightTable = &[
    ("food", 0.9),
    ("accept", 0.0),
    ("deny", 0.0),
    ("add", 0.1),
    ("remove", 0.0),
];

pub const CANCEL_WEIGHTS: WeightTable = &[
    ("food", 0.0),
    ("accept", 0.0),
    ("deny", 1.0),
    ("add", 0.0),
    ("remove", 0.0),
];

pub const CANCEL_WITH_FOOD_WEIGHTS: WeightTable = &[
    ("food", 0.4),
    ("accept", 0.0),
    ("deny", 0.6),
    ("add", 0.0),
    ("remove", 0.0),
];

pub const CONFIRM_WEIGHTS: WeightTable = &[
    ("food", 0.0),
    ("accept", 1.0),
    ("deny", 0.0),
    ("add", 0.0),
    ("remove", 0.0),
];

pub const ADD_ITEM_WEIGHTS: WeightTable = &[
    ("food", 0.7),
    ("accept", 0.0),
    ("deny", 0.0),
    ("add", 0.3),
    ("remove", 0.0),
];

pub const REMOVE_ITEM_WEIGHTS: WeightTable = &[
    ("food", 0.7),
    ("accept", 0.0),
    ("deny", 0.0),
    ("add", 0.0),
    ("remove", 0.3),
];

/// Which Cancel table the scorer uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelWeights {
    /// deny=1.0
    #[default]
    DenyOnly,
    /// food=0.4, deny=0.6
    FoodAndDeny,
}

impl CancelWeights {
    pub fn table(self) -> WeightTable {
        match self {
            CancelWeights::DenyOnly => CANCEL_WEIGHTS,
            CancelWeights::FoodAndDeny => CANCEL_WITH_FOOD_WEIGHTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a tagged-token sequence against one weight table.
pub fn score(tokens: &[TaggedToken], weights: &[(&str, f64)], prior: f64) -> f64 {
    weights.iter().fold(prior, |value, (category, weight)| {
        let n = tokens.iter().filter(|t| t.has_tag(category)).count() as f64;
        value * (weight * n + SMOOTHING_BIAS)
    })
}

/// One intent and the table it is scored with.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    pub intent: Intent,
    pub weights: WeightTable,
}

impl Classifier {
    pub fn score(&self, tokens: &[TaggedToken], prior: f64) -> f64 {
        score(tokens, self.weights, prior)
    }
}

/// The five classifiers plus the shared prior.
#[derive(Debug, Clone)]
pub struct IntentScorer {
    classifiers: [Classifier; 5],
    prior: f64,
}

impl IntentScorer {
    pub fn new(cancel: CancelWeights, prior: f64) -> Self {
        let classifiers = [
            Classifier { intent: Intent::Order, weights: ORDER_WEIGHTS },
            Classifier { intent: Intent::Cancel, weights: cancel.table() },
            Classifier { intent: Intent::Confirm, weights: CONFIRM_WEIGHTS },
            Classifier { intent: Intent::AddItem, weights: ADD_ITEM_WEIGHTS },
            Classifier { intent: Intent::RemoveItem, weights: REMOVE_ITEM_WEIGHTS },
        ];
        Self { classifiers, prior }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.cancel_weights, config.prior)
    }

    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    pub fn score_all(&self, tokens: &[TaggedToken]) -> IntentScores {
        let mut scores = IntentScores::default();
        for classifier in &self.classifiers {
            *scores.get_mut(classifier.intent) = classifier.score(tokens, self.prior);
        }
        scores
    }
}

impl Default for IntentScorer {
    fn default() -> Self {
        Self::new(CancelWeights::default(), 1.0)
    }
}

// ---------------------------------------------------------------------------
// IntentScores
// ---------------------------------------------------------------------------

/// The five scores for one utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntentScores {
    pub order: f64,
    pub cancel: f64,
    pub confirm: f64,
    pub add_item: f64,
    pub remove_item: f64,
}

impl IntentScores {
    pub fn get(&self, intent: Intent) -> f64 {
        match intent {
            Intent::Order => self.order,
            Intent::Cancel => self.cancel,
            Intent::Confirm => self.confirm,
            Intent::AddItem => self.add_item,
            Intent::RemoveItem => self.remove_item,
        }
    }

    fn get_mut(&mut self, intent: Intent) -> &mut f64 {
        match intent {
            Intent::Order => &mut self.order,
            Intent::Cancel => &mut self.cancel,
            Intent::Confirm => &mut self.confirm,
            Intent::AddItem => &mut self.add_item,
            Intent::RemoveItem => &mut self.remove_item,
        }
    }

    fn max(&self) -> f64 {
        Intent::ALL.iter().map(|&i| self.get(i)).fold(f64::MIN, f64::max)
    }

    /// Highest-scoring intent. Ties go to the earliest in `Intent::ALL`;
    /// the dialogue controller breaks ties itself through `is_best`.
    pub fn best(&self) -> Intent {
        let max = self.max();
        Intent::ALL
            .into_iter()
            .find(|&i| self.get(i) == max)
            .unwrap_or(Intent::Order)
    }

    /// Does `intent` share the maximum score?
    pub fn is_best(&self, intent: Intent) -> bool {
        self.get(intent) == self.max()
    }

    /// All five scores equal: nothing in the input moved any classifier.
    pub fn is_unrecognized(&self) -> bool {
        let first = self.order;
        Intent::ALL.iter().all(|&i| self.get(i) == first)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(word: &str, tags: &[&str]) -> TaggedToken {
        TaggedToken::new(word, tags.iter().copied())
    }

    fn floor() -> f64 {
        SMOOTHING_BIAS.powi(5)
    }

    #[test]
    fn test_empty_input_is_smoothing_floor() {
        let scores = IntentScorer::default().score_all(&[]);
        for intent in Intent::ALL {
            assert!((scores.get(intent) - floor()).abs() < 1e-24, "{} got: {}", intent, scores.get(intent));
        }
        assert!(scores.is_unrecognized());
    }

    #[test]
    fn test_untagged_tokens_unrecognized() {
        let scores = IntentScorer::default().score_all(&[tok("hello", &[]), tok("there", &[])]);
        assert!(scores.is_unrecognized());
    }

    #[test]
    fn test_score_single_food() {
        let s = score(&[tok("burger", &["food"])], ORDER_WEIGHTS, 1.0);
        let expected = 0.901 * SMOOTHING_BIAS.powi(4);
        assert!((s - expected).abs() < 1e-18, "got: {}", s);
    }

    #[test]
    fn test_score_counts_tokens_not_tags() {
        let one = score(&[tok("burger", &["food"])], CONFIRM_WEIGHTS, 1.0);
        let two = score(&[tok("burger", &["food"]), tok("fries", &["food"])], CONFIRM_WEIGHTS, 1.0);
        assert_eq!(one, two);
        let a = score(&[tok("fries", &["food"])], ADD_ITEM_WEIGHTS, 1.0);
        let b = score(&[tok("fries", &["food"]), tok("coke", &["food"])], ADD_ITEM_WEIGHTS, 1.0);
        assert!(b > a);
    }

    #[test]
    fn test_score_tag_match_case_insensitive() {
        let upper = score(&[tok("burger", &["FOOD"])], ORDER_WEIGHTS, 1.0);
        let lower = score(&[tok("burger", &["food"])], ORDER_WEIGHTS, 1.0);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_prior_scales_score() {
        let tokens = [tok("burger", &["food"])];
        let base = score(&tokens, ORDER_WEIGHTS, 1.0);
        let halved = score(&tokens, ORDER_WEIGHTS, 0.5);
        assert!((halved * 2.0 - base).abs() < 1e-18);
    }

    #[test]
    fn test_two_food_tokens_order_beats_confirm_and_cancel() {
        let tokens = [tok("burger", &["food"]), tok("fries", &["food"])];
        for cancel in [CancelWeights::DenyOnly, CancelWeights::FoodAndDeny] {
            let scores = IntentScorer::new(cancel, 1.0).score_all(&tokens);
            assert!(scores.order > scores.confirm, "got: {:?}", scores);
            assert!(scores.order > scores.cancel, "got: {:?}", scores);
        }
    }

    #[test]
    fn test_food_alone_ties_add_and_remove() {
        let scores = IntentScorer::default().score_all(&[tok("burger", &["food"])]);
        assert_eq!(scores.best(), Intent::Order);
        assert_eq!(scores.add_item, scores.remove_item);
    }

    #[test]
    fn test_add_word_makes_add_item_best() {
        let scores = IntentScorer::default().score_all(&[tok("add", &["add"]), tok("fries", &["food"])]);
        assert_eq!(scores.best(), Intent::AddItem, "got: {:?}", scores);
        assert!(scores.add_item > scores.remove_item);
    }

    #[test]
    fn test_remove_word_makes_remove_item_best() {
        let scores = IntentScorer::default().score_all(&[tok("remov", &["remove"]), tok("fries", &["food"])]);
        assert_eq!(scores.best(), Intent::RemoveItem, "got: {:?}", scores);
    }

    #[test]
    fn test_accept_is_confirm() {
        let scores = IntentScorer::default().score_all(&[tok("yes", &["accept"])]);
        assert_eq!(scores.best(), Intent::Confirm);
        assert!(!scores.is_unrecognized());
    }

    #[test]
    fn test_deny_is_cancel() {
        let scores = IntentScorer::default().score_all(&[tok("no", &["deny"])]);
        assert_eq!(scores.best(), Intent::Cancel);
    }

    #[test]
    fn test_food_and_deny_variant_counts_food() {
        let tokens = [tok("no", &["deny"]), tok("burger", &["food"])];
        let deny_only = IntentScorer::new(CancelWeights::DenyOnly, 1.0).score_all(&tokens);
        let with_food = IntentScorer::new(CancelWeights::FoodAndDeny, 1.0).score_all(&tokens);
        assert!(with_food.cancel > deny_only.cancel);
    }

    #[test]
    fn test_is_best_with_ties() {
        let scores = IntentScores { order: 1.0, cancel: 1.0, confirm: 0.5, add_item: 0.1, remove_item: 0.1 };
        assert!(scores.is_best(Intent::Order));
        assert!(scores.is_best(Intent::Cancel));
        assert!(!scores.is_best(Intent::Confirm));
        assert_eq!(scores.best(), Intent::Order);
        assert!(!scores.is_unrecognized());
    }

    #[test]
    fn test_from_config() {
        let config = ScoringConfig { prior: 2.0, cancel_weights: CancelWeights::FoodAndDeny };
        let scorer = IntentScorer::from_config(&config);
        let cancel = scorer.classifiers().iter().find(|c| c.intent == Intent::Cancel).unwrap();
        assert_eq!(cancel.weights, CANCEL_WITH_FOOD_WEIGHTS);
        let scores = scorer.score_all(&[]);
        assert!((scores.order - 2.0 * floor()).abs() < 1e-24);
    }

    #[test]
    fn test_intent_display() {
        assert_eq!(Intent::AddItem.to_string(), "add_item");
        assert_eq!(Intent::ALL.len(), 5);
    }
}
