//! Order-taking dialogue: session state and the turn controller.
//!
//! Maintains lightweight state across conversation turns:
//! - **DialogueState**: Greeting → TakingOrder → ConfirmingOrder → Goodbye
//! - **Session**: current/previous state, the order list, the pending
//!   upsell suggestion, turn count and last intent
//! - **OrderTaker**: scores each turn's tagged tokens and applies the
//!   transition for the current state
//!
//! Every template choice goes through a [`Chooser`], so tests can replace
//! the random selection with a fixed one.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::intent::{Intent, IntentScorer, IntentScores};
use super::lexicon::Lexicon;
use super::normalize::{self, TaggedToken};
use super::vocab::DroidVocab;
use super::DroidResponse;

const FOOD_TAG: &str = "food";

const ASK_ADDITION: &str = "what would you like to add?";

// ---------------------------------------------------------------------------
// Dialogue state
// ---------------------------------------------------------------------------

/// Where the conversation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueState {
    Greeting,
    TakingOrder,
    ConfirmingOrder,
    /// Terminal until the session is reset.
    Goodbye,
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialogueState::Greeting => "greeting",
            DialogueState::TakingOrder => "taking order",
            DialogueState::ConfirmingOrder => "confirming order",
            DialogueState::Goodbye => "goodbye",
        };
        f.write_str(name)
    }
}

/// One entry of the order list. `tags` always contains "food".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item: String,
    pub tags: BTreeSet<String>,
}

impl OrderLine {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            tags: BTreeSet::from([FOOD_TAG.to_string()]),
        }
    }

    fn from_token(token: &TaggedToken) -> Self {
        let mut line = Self::new(token.token.clone());
        line.tags.extend(token.tags.iter().map(|t| t.to_lowercase()));
        line
    }
}

/// The upsell offered when the customer declines to add more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Added to the order if the customer accepts.
    pub item: String,
    /// Second pick, offered alongside `item` by templates using `{second}`.
    /// Only `item` is added on acceptance.
    pub second: String,
}

/// Per-customer conversation state. Each session owns its order list; hosts
/// running several conversations keep one `Session` each.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: DialogueState,
    /// State before the most recent transition. Diagnostic only.
    pub previous: Option<DialogueState>,
    pub orders: Vec<OrderLine>,
    pub suggestion: Option<Suggestion>,
    pub turn_count: usize,
    /// Best intent of the last turn, `None` when nothing was recognized.
    pub last_intent: Option<Intent>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: DialogueState::Greeting,
            previous: None,
            orders: Vec::new(),
            suggestion: None,
            turn_count: 0,
            last_intent: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == DialogueState::Goodbye
    }

    pub fn items(&self) -> Vec<&str> {
        self.orders.iter().map(|o| o.item.as_str()).collect()
    }

    fn transition(&mut self, next: DialogueState) {
        tracing::info!(from = %self.state, to = %next, "dialogue transition");
        self.previous = Some(self.state);
        self.state = next;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Chooser: pluggable template selection
// ---------------------------------------------------------------------------

/// Picks an index into a template pool or the menu.
pub trait Chooser {
    /// An index in `0..len`. Out-of-range answers are wrapped.
    fn pick(&mut self, len: usize) -> usize;

    fn choose<'t>(&mut self, pool: &'t [String]) -> Option<&'t str> {
        if pool.is_empty() {
            return None;
        }
        let index = self.pick(pool.len()) % pool.len();
        Some(pool[index].as_str())
    }
}

impl<F: FnMut(usize) -> usize> Chooser for F {
    fn pick(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform random choice.
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Reproducible choices.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for RandomChooser {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

// ---------------------------------------------------------------------------
// OrderTaker: the turn controller
// ---------------------------------------------------------------------------

/// Drives a [`Session`] one utterance at a time.
pub struct OrderTaker<'a, C: Chooser> {
    lexicon: &'a Lexicon,
    vocab: &'a DroidVocab,
    scorer: IntentScorer,
    chooser: C,
}

impl<'a, C: Chooser> OrderTaker<'a, C> {
    pub fn new(lexicon: &'a Lexicon, vocab: &'a DroidVocab, chooser: C) -> Self {
        Self {
            lexicon,
            vocab,
            scorer: IntentScorer::from_config(&vocab.scoring),
            chooser,
        }
    }

    pub fn with_scorer(mut self, scorer: IntentScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn scorer(&self) -> &IntentScorer {
        &self.scorer
    }

    /// Opening line for a fresh session.
    pub fn greet(&mut self) -> String {
        self.pick_template(Pool::Greetings)
    }

    /// Normalize an utterance and run one turn.
    pub fn respond(&mut self, input: &str, session: &mut Session) -> DroidResponse {
        if session.is_closed() {
            return self.dispatch(&[], session);
        }
        let normalized = normalize::normalize(input, self.lexicon);
        self.dispatch(&normalized.tagged, session)
    }

    /// Run one turn over already-tagged tokens.
    pub fn dispatch(&mut self, tagged: &[TaggedToken], session: &mut Session) -> DroidResponse {
        session.turn_count += 1;

        if session.is_closed() {
            return DroidResponse::Closed {
                text: self.pick_template(Pool::Farewells),
            };
        }

        let scores = self.scorer.score_all(tagged);
        let recognized = !tagged.is_empty() && !scores.is_unrecognized();
        session.last_intent = recognized.then(|| scores.best());
        tracing::debug!(
            turn = session.turn_count,
            state = %session.state,
            best = ?session.last_intent,
            ?scores,
            "scored turn"
        );

        if !recognized {
            return self.clarify();
        }

        match session.state {
            DialogueState::Greeting => self.on_greeting(tagged, &scores, session),
            DialogueState::TakingOrder => self.on_taking_order(tagged, &scores, session),
            DialogueState::ConfirmingOrder => self.on_confirming_order(&scores, session),
            DialogueState::Goodbye => DroidResponse::Closed {
                text: self.pick_template(Pool::Farewells),
            },
        }
    }

    /// Back to Greeting with an empty order. Returns a fresh greeting.
    pub fn reset(&mut self, session: &mut Session) -> String {
        tracing::info!(from = %session.state, items = session.orders.len(), "session reset");
        *session = Session::new();
        self.greet()
    }

    // -- State handlers --

    fn on_greeting(&mut self, tagged: &[TaggedToken], scores: &IntentScores, session: &mut Session) -> DroidResponse {
        if !(scores.is_best(Intent::Order) || scores.is_best(Intent::AddItem)) {
            return self.clarify();
        }

        let items = add_food(tagged, session);
        session.transition(DialogueState::TakingOrder);
        let text = format!(
            "your current order is: {}. {}",
            join_items(session.items()),
            self.pick_template(Pool::Confirmations)
        );
        DroidResponse::OrderStarted { items, text }
    }

    fn on_taking_order(&mut self, tagged: &[TaggedToken], scores: &IntentScores, session: &mut Session) -> DroidResponse {
        let order_best = scores.is_best(Intent::Order);

        if scores.is_best(Intent::Confirm) {
            session.transition(DialogueState::ConfirmingOrder);
            return DroidResponse::AskAddition { text: ASK_ADDITION.to_string() };
        }

        if scores.is_best(Intent::AddItem) || (order_best && scores.add_item > scores.remove_item) {
            let items = add_food(tagged, session);
            let text = added_text(&items);
            return DroidResponse::ItemsAdded { items, text };
        }

        if scores.is_best(Intent::RemoveItem) || (order_best && scores.remove_item > scores.add_item) {
            let items: Vec<String> = food_tokens(tagged).map(|t| t.token.clone()).collect();
            session
                .orders
                .retain(|line| !items.iter().any(|i| i.eq_ignore_ascii_case(&line.item)));
            let text = format!(
                "{} has been removed from your order. Would you like to add anything else?",
                join_items(&items)
            );
            return DroidResponse::ItemsRemoved { items, text };
        }

        if scores.is_best(Intent::Cancel) {
            return self.suggest(session);
        }

        self.clarify()
    }

    fn on_confirming_order(&mut self, scores: &IntentScores, session: &mut Session) -> DroidResponse {
        if scores.is_best(Intent::Confirm) {
            let Some(suggestion) = session.suggestion.take() else {
                return self.clarify();
            };
            session.orders.push(OrderLine::new(suggestion.item.clone()));
            session.transition(DialogueState::ConfirmingOrder);
            let items = vec![suggestion.item];
            let text = added_text(&items);
            return DroidResponse::ItemsAdded { items, text };
        }

        if scores.is_best(Intent::Cancel) {
            let items: Vec<String> = session.items().into_iter().map(String::from).collect();
            let text = format!(
                "your full order is: {}. {}",
                join_items(&items),
                self.pick_template(Pool::Farewells)
            );
            session.transition(DialogueState::Goodbye);
            return DroidResponse::OrderComplete { items, text };
        }

        self.clarify()
    }

    // -- Helpers --

    /// Pick two menu items and offer the first.
    fn suggest(&mut self, session: &mut Session) -> DroidResponse {
        let vocab = self.vocab;
        let menu = &vocab.menu;
        let picked = self.chooser.choose(menu).zip(self.chooser.choose(menu));
        session.transition(DialogueState::ConfirmingOrder);

        let Some((item, second)) = picked else {
            session.suggestion = None;
            return DroidResponse::Suggestion {
                item: None,
                text: self.pick_template(Pool::Confirmations),
            };
        };

        let text = self
            .pick_template(Pool::Suggestions)
            .replace("{item}", item)
            .replace("{second}", second);
        session.suggestion = Some(Suggestion {
            item: item.to_string(),
            second: second.to_string(),
        });
        DroidResponse::Suggestion { item: Some(item.to_string()), text }
    }

    fn clarify(&mut self) -> DroidResponse {
        DroidResponse::Clarify {
            text: self.pick_template(Pool::Errors),
        }
    }

    fn pick_template(&mut self, pool: Pool) -> String {
        let vocab = self.vocab;
        let responses = &vocab.responses;
        let pool = match pool {
            Pool::Greetings => &responses.greetings,
            Pool::Errors => &responses.errors,
            Pool::Suggestions => &responses.suggestions,
            Pool::Confirmations => &responses.confirmations,
            Pool::Farewells => &responses.farewells,
        };
        self.chooser.choose(pool).unwrap_or_default().to_string()
    }
}

#[derive(Debug, Clone, Copy)]
enum Pool {
    Greetings,
    Errors,
    Suggestions,
    Confirmations,
    Farewells,
}

fn food_tokens(tagged: &[TaggedToken]) -> impl Iterator<Item = &TaggedToken> {
    tagged.iter().filter(|t| t.has_tag(FOOD_TAG))
}

/// Append every food-tagged token to the order. Returns the added items.
fn add_food(tagged: &[TaggedToken], session: &mut Session) -> Vec<String> {
    let lines: Vec<OrderLine> = food_tokens(tagged).map(OrderLine::from_token).collect();
    let items = lines.iter().map(|l| l.item.clone()).collect();
    session.orders.extend(lines);
    items
}

fn added_text(items: &[String]) -> String {
    format!(
        "{} has been added to your order. Would you like to add anything else?",
        join_items(items)
    )
}

/// Items joined with ", "; "nothing" when empty.
pub fn join_items<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> String {
    let parts: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if parts.is_empty() {
        "nothing".to_string()
    } else {
        parts.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nl::vocab;

    fn tok(word: &str, tags: &[&str]) -> TaggedToken {
        TaggedToken::new(word, tags.iter().copied())
    }

    fn first(_: usize) -> usize {
        0
    }

    fn session_in(state: DialogueState) -> Session {
        Session { state, ..Session::new() }
    }

    // -- Session --

    #[test]
    fn test_new_session() {
        let s = Session::new();
        assert_eq!(s.state, DialogueState::Greeting);
        assert_eq!(s.previous, None);
        assert!(s.orders.is_empty());
        assert_eq!(s.turn_count, 0);
    }

    #[test]
    fn test_transition_records_previous() {
        let mut s = Session::new();
        s.transition(DialogueState::TakingOrder);
        assert_eq!(s.previous, Some(DialogueState::Greeting));
        assert_eq!(s.state, DialogueState::TakingOrder);
    }

    #[test]
    fn test_order_line_always_food() {
        let line = OrderLine::from_token(&tok("burger", &["Food"]));
        assert!(line.tags.contains("food"));
        assert_eq!(line.tags.len(), 1);
        assert!(OrderLine::new("Water").tags.contains("food"));
    }

    // -- Chooser --

    #[test]
    fn test_closure_chooser() {
        let pool = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut last = |len: usize| len - 1;
        assert_eq!(last.choose(&pool), Some("c"));
        let mut wrap = |_: usize| 7;
        assert_eq!(wrap.choose(&pool), Some("b"));
        assert_eq!(wrap.choose(&[]), None);
    }

    #[test]
    fn test_seeded_chooser_reproducible() {
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        let xs: Vec<usize> = (0..20).map(|_| a.pick(10)).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.pick(10)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&x| x < 10));
    }

    #[test]
    fn test_random_chooser_zero_len() {
        assert_eq!(RandomChooser::seeded(1).pick(0), 0);
    }

    // -- Dispatch --

    #[test]
    fn test_greeting_order_starts_taking_order() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = Session::new();

        let resp = taker.dispatch(&[tok("burger", &["food"]), tok("fries", &["food"])], &mut s);
        assert!(matches!(resp, DroidResponse::OrderStarted { .. }), "got: {:?}", resp);
        assert_eq!(s.state, DialogueState::TakingOrder);
        assert_eq!(s.items(), vec!["burger", "fries"]);
        assert!(resp.text().starts_with("your current order is: burger, fries. "), "got: {}", resp.text());
        assert_eq!(s.last_intent, Some(Intent::Order));
    }

    #[test]
    fn test_greeting_confirm_is_clarified() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = Session::new();

        let resp = taker.dispatch(&[tok("yes", &["accept"])], &mut s);
        assert!(matches!(resp, DroidResponse::Clarify { .. }), "got: {:?}", resp);
        assert_eq!(s.state, DialogueState::Greeting);
        assert_eq!(resp.text(), voc.responses.errors[0]);
    }

    #[test]
    fn test_empty_tokens_clarify() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::TakingOrder);

        let resp = taker.dispatch(&[], &mut s);
        assert!(matches!(resp, DroidResponse::Clarify { .. }));
        assert_eq!(s.state, DialogueState::TakingOrder);
        assert_eq!(s.last_intent, None);
    }

    #[test]
    fn test_food_alone_in_taking_order_falls_through() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::TakingOrder);

        // Order is best but add == remove: neither branch fires
        let resp = taker.dispatch(&[tok("coke", &["food"])], &mut s);
        assert!(matches!(resp, DroidResponse::Clarify { .. }), "got: {:?}", resp);
        assert!(s.orders.is_empty());
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::TakingOrder);
        s.orders = vec![OrderLine::new("Burger"), OrderLine::new("fries"), OrderLine::new("burger")];

        let resp = taker.dispatch(&[tok("remov", &["remove"]), tok("BURGER", &["food"])], &mut s);
        assert!(matches!(resp, DroidResponse::ItemsRemoved { .. }), "got: {:?}", resp);
        assert_eq!(s.items(), vec!["fries"]);
        assert_eq!(
            resp.text(),
            "BURGER has been removed from your order. Would you like to add anything else?"
        );
    }

    #[test]
    fn test_suggestion_uses_menu_and_template() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::TakingOrder);

        let resp = taker.dispatch(&[tok("no", &["deny"])], &mut s);
        let expected = voc.responses.suggestions[0].replace("{item}", &voc.menu[0]);
        assert_eq!(resp.text(), expected);
        assert_eq!(s.state, DialogueState::ConfirmingOrder);
        assert_eq!(s.suggestion.as_ref().map(|x| x.item.as_str()), Some(voc.menu[0].as_str()));
    }

    #[test]
    fn test_suggestion_with_empty_menu() {
        let lex = Lexicon::embedded();
        let mut voc = vocab::embedded();
        voc.menu.clear();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::TakingOrder);

        let resp = taker.dispatch(&[tok("no", &["deny"])], &mut s);
        assert!(matches!(resp, DroidResponse::Suggestion { item: None, .. }), "got: {:?}", resp);
        assert_eq!(s.state, DialogueState::ConfirmingOrder);
        assert!(s.suggestion.is_none());
    }

    #[test]
    fn test_accepting_suggestion_consumes_it() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::ConfirmingOrder);
        s.suggestion = Some(Suggestion { item: "Water".into(), second: "Coke".into() });

        let resp = taker.dispatch(&[tok("yes", &["accept"])], &mut s);
        assert!(matches!(resp, DroidResponse::ItemsAdded { .. }), "got: {:?}", resp);
        assert_eq!(s.items(), vec!["Water"]);
        assert!(s.suggestion.is_none());

        let again = taker.dispatch(&[tok("yes", &["accept"])], &mut s);
        assert!(matches!(again, DroidResponse::Clarify { .. }), "got: {:?}", again);
        assert_eq!(s.items(), vec!["Water"]);
    }

    #[test]
    fn test_suggestion_fills_both_picks() {
        let lex = Lexicon::embedded();
        let mut voc = vocab::embedded();
        voc.responses.suggestions = vec!["a {item} or a {second}?".into()];
        let mut n = 0;
        let counting = move |len: usize| {
            let i = n % len;
            n += 1;
            i
        };
        let mut taker = OrderTaker::new(&lex, &voc, counting);
        let mut s = session_in(DialogueState::TakingOrder);

        let resp = taker.dispatch(&[tok("no", &["deny"])], &mut s);
        let expected = format!("a {} or a {}?", voc.menu[0], voc.menu[1]);
        assert_eq!(resp.text(), expected);
        assert_eq!(
            s.suggestion,
            Some(Suggestion { item: voc.menu[0].clone(), second: voc.menu[1].clone() })
        );
    }

    #[test]
    fn test_goodbye_is_terminal() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::Goodbye);
        s.orders.push(OrderLine::new("burger"));

        let resp = taker.dispatch(&[tok("burger", &["food"])], &mut s);
        assert!(matches!(resp, DroidResponse::Closed { .. }), "got: {:?}", resp);
        assert_eq!(s.state, DialogueState::Goodbye);
        assert_eq!(s.items(), vec!["burger"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = session_in(DialogueState::ConfirmingOrder);
        s.orders.push(OrderLine::new("burger"));
        s.turn_count = 4;

        let greeting = taker.reset(&mut s);
        assert_eq!(greeting, voc.responses.greetings[0]);
        assert_eq!(s.state, DialogueState::Greeting);
        assert!(s.orders.is_empty());
        assert_eq!(s.turn_count, 0);
    }

    #[test]
    fn test_turn_count_advances() {
        let lex = Lexicon::embedded();
        let voc = vocab::embedded();
        let mut taker = OrderTaker::new(&lex, &voc, first);
        let mut s = Session::new();
        taker.dispatch(&[], &mut s);
        taker.respond("hello", &mut s);
        assert_eq!(s.turn_count, 2);
    }

    // -- Formatting --

    #[test]
    fn test_join_items() {
        assert_eq!(join_items(Vec::<String>::new()), "nothing");
        assert_eq!(join_items(["burger"]), "burger");
        assert_eq!(join_items(["burger", "fries", "coke"]), "burger, fries, coke");
    }
}
