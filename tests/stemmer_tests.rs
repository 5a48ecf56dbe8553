/// Stemmer integration tests: a vocabulary sample plus property checks.

use order_droid::nl::stemmer::stem;
use proptest::prelude::*;

// ===========================================================================
// Sample vocabulary
// ===========================================================================

#[test]
fn test_order_vocabulary() {
    let cases = [
        ("burgers", "burger"),
        ("drinks", "drink"),
        ("nuggets", "nugget"),
        ("salads", "salad"),
        ("shakes", "shake"),
        ("wanted", "want"),
        ("ordering", "order"),
        ("removing", "remov"),
        ("deleted", "delet"),
    ];
    for (word, expected) in cases {
        assert_eq!(stem(word), expected, "stem({})", word);
    }
}

#[test]
fn test_classic_examples() {
    let cases = [
        ("caresses", "caress"),
        ("ponies", "poni"),
        ("feed", "feed"),
        ("agreed", "agree"),
        ("plastered", "plaster"),
        ("motoring", "motor"),
        ("conflated", "conflate"),
        ("troubled", "trouble"),
        ("sized", "size"),
        ("hopping", "hop"),
        ("falling", "fall"),
        ("hissing", "hiss"),
        ("failing", "fail"),
        ("filing", "file"),
    ];
    for (word, expected) in cases {
        assert_eq!(stem(word), expected, "stem({})", word);
    }
}

#[test]
fn test_stemmed_food_words_still_tagged_by_fragment() {
    // word_tags.txt matches fragments, so stems only need to keep them
    for (word, fragment) in [("removes", "remov"), ("deleting", "delet"), ("erasing", "eras")] {
        assert!(stem(word).contains(fragment), "stem({}) = {}", word, stem(word));
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_short_words_unchanged(word in "\\PC{0,3}") {
        prop_assert_eq!(stem(&word), word);
    }

    #[test]
    fn prop_never_panics(word in "\\PC{0,32}") {
        let _ = stem(&word);
    }

    #[test]
    fn prop_never_grows(word in "[a-z]{4,20}") {
        let out = stem(&word);
        prop_assert!(!out.is_empty());
        prop_assert!(out.chars().count() <= word.chars().count(), "stem({}) = {}", word, out);
    }

    #[test]
    fn prop_blank_unchanged(word in "[ \\t]{0,12}") {
        prop_assert_eq!(stem(&word), word);
    }
}
