//! Affix-stripping stemmer (Porter's algorithm, steps 1–5).
//!
//! Reduces an inflected word to an approximate root by rewriting its tail
//! in five ordered steps. The final-`e` step of the classic algorithm is not
//! applied, so `hoping` stems to `hope` and `eating` to `eate`.
//!
//! Operates on `char`s. Only lowercase ASCII `a e i o u` count as vowels;
//! anything else (uppercase, digits, punctuation) is treated as a consonant
//! and simply fails to match the suffix tables.

/// Suffix rewrite rules, tried in order; the first rule that rewrites wins.
type Rules = &'static [(&'static str, &'static str)];

/// Step 3: fold double suffixes, keyed by the second-to-last letter.
const STEP3_RULES: &[(char, Rules)] = &[
    ('a', &[("ational", "ate"), ("tional", "tion")]),
    ('c', &[("enci", "ence"), ("anci", "ance")]),
    ('e', &[("izer", "ize")]),
    ('l', &[("bli", "ble"), ("alli", "al"), ("entli", "ent"), ("eli", "e"), ("ousli", "ous")]),
    ('o', &[("ization", "ize"), ("ation", "ate"), ("ator", "ate")]),
    ('s', &[("alism", "al"), ("iveness", "ive"), ("fulness", "ful"), ("ousness", "ous")]),
    ('t', &[("aliti", "al"), ("iviti", "ive"), ("biliti", "ble")]),
    ('g', &[("logi", "log")]),
];

/// Step 4: simplify -ic-, -ful, -ness, keyed by the last letter.
const STEP4_RULES: &[(char, Rules)] = &[
    ('e', &[("icate", "ic"), ("ative", ""), ("alize", "al")]),
    ('i', &[("iciti", "ic")]),
    ('l', &[("ical", "ic"), ("ful", "")]),
    ('s', &[("ness", "")]),
];

/// Step 5: suffixes removed outright, keyed by the second-to-last letter.
const STEP5_SUFFIXES: &[(char, &[&str])] = &[
    ('a', &["al"]),
    ('c', &["ance", "ence"]),
    ('e', &["er"]),
    ('i', &["ic"]),
    ('l', &["able", "ible"]),
    ('n', &["ant", "ement", "ment", "ent"]),
    ('o', &["ion", "ou"]),
    ('s', &["ism"]),
    ('t', &["ate", "iti"]),
    ('u', &["ous"]),
    ('v', &["ive"]),
    ('z', &["ize"]),
];

/// Stem a word. Words of three characters or fewer, and blank input, are
/// returned unchanged.
pub fn stem(word: &str) -> String {
    if word.trim().is_empty() || word.chars().count() <= 3 {
        return word.to_string();
    }

    let mut s = Stemmer::new(word);
    s.step1();
    s.step2();
    s.step3();
    s.step4();
    s.step5();
    s.finish()
}

/// Working state: the word's characters plus two indices. `end` is the
/// index of the current last letter; `boundary` is the index of the last
/// letter of the stem left when the most recently matched suffix is
/// removed (-1 when the suffix spans the whole word).
struct Stemmer {
    chars: Vec<char>,
    boundary: isize,
    end: isize,
}

impl Stemmer {
    fn new(word: &str) -> Self {
        let chars: Vec<char> = word.chars().collect();
        let end = chars.len() as isize - 1;
        Self { chars, boundary: 0, end }
    }

    fn finish(self) -> String {
        self.chars[..=self.end as usize].iter().collect()
    }

    fn at(&self, i: isize) -> char {
        self.chars[i as usize]
    }

    // -- Steps --

    /// Plurals and -ed / -ing.
    fn step1(&mut self) {
        if self.at(self.end) == 's' {
            if self.ends_with("sses") {
                self.truncate(2);
            } else if self.ends_with("ies") {
                self.overwrite_ending("i");
            } else if self.at(self.end - 1) != 's' {
                self.truncate(1);
            }
        }

        if self.ends_with("eed") {
            if self.consonant_sequence_count() > 0 {
                self.truncate(1);
            }
        } else if (self.ends_with("ed") || self.ends_with("ing")) && self.vowel_in_stem() {
            self.end = self.boundary;
            if self.ends_with("at") {
                self.overwrite_ending("ate");
            } else if self.ends_with("bl") {
                self.overwrite_ending("ble");
            } else if self.ends_with("iz") {
                self.overwrite_ending("ize");
            } else if self.ends_with_double_consonant() {
                if !matches!(self.at(self.end - 1), 'l' | 's' | 'z') {
                    self.truncate(1);
                }
            } else if self.consonant_sequence_count() == 1 && self.preceded_by_cvc(self.end) {
                self.overwrite_ending("e");
            }
        }
    }

    /// Terminal y → i when the stem has another vowel.
    fn step2(&mut self) {
        if self.ends_with("y") && self.vowel_in_stem() {
            self.overwrite_ending("i");
        }
    }

    fn step3(&mut self) {
        if self.end < 1 {
            return;
        }
        if let Some(rules) = lookup(STEP3_RULES, self.at(self.end - 1)) {
            self.replace_first(rules);
        }
    }

    fn step4(&mut self) {
        if let Some(rules) = lookup(STEP4_RULES, self.at(self.end)) {
            self.replace_first(rules);
        }
    }

    fn step5(&mut self) {
        if self.end < 1 {
            return;
        }
        let Some(suffixes) = lookup(STEP5_SUFFIXES, self.at(self.end - 1)) else {
            return;
        };

        let matched = suffixes.iter().any(|suffix| {
            if !self.ends_with(suffix) {
                return false;
            }
            // -ion only goes when the stem ends in s or t
            *suffix != "ion" || (self.boundary >= 0 && matches!(self.at(self.boundary), 's' | 't'))
        });

        if matched && self.consonant_sequence_count() > 1 {
            self.end = self.boundary;
        }
    }

    // -- Primitives --

    fn truncate(&mut self, n: isize) {
        self.end -= n;
    }

    /// Consonant test with the `y` rule: `y` is a consonant at the start of
    /// the word or after a vowel.
    fn is_consonant(&self, i: isize) -> bool {
        match self.at(i) {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of vowel→consonant transitions in `chars[0..=boundary]`.
    /// Single left-to-right pass.
    fn consonant_sequence_count(&self) -> usize {
        let mut count = 0;
        let mut prev_consonant: Option<bool> = None;
        for i in 0..=self.boundary {
            let consonant = match self.at(i) {
                'a' | 'e' | 'i' | 'o' | 'u' => false,
                'y' => !matches!(prev_consonant, Some(true)),
                _ => true,
            };
            if consonant && prev_consonant == Some(false) {
                count += 1;
            }
            prev_consonant = Some(consonant);
        }
        count
    }

    fn vowel_in_stem(&self) -> bool {
        (0..=self.boundary).any(|i| !self.is_consonant(i))
    }

    fn ends_with_double_consonant(&self) -> bool {
        self.end > 0 && self.at(self.end) == self.at(self.end - 1) && self.is_consonant(self.end)
    }

    /// consonant-vowel-consonant ending at `i`, final consonant not w/x/y.
    fn preceded_by_cvc(&self, i: isize) -> bool {
        if i < 2 || !self.is_consonant(i) || self.is_consonant(i - 1) || !self.is_consonant(i - 2) {
            return false;
        }
        !matches!(self.at(i), 'w' | 'x' | 'y')
    }

    /// Does the word (up to `end`) end with `suffix`? On a match, moves
    /// `boundary` to just before the suffix.
    fn ends_with(&mut self, suffix: &str) -> bool {
        let len = suffix.chars().count() as isize;
        let start = self.end - len + 1;
        if start < 0 {
            return false;
        }
        let matches = suffix
            .chars()
            .enumerate()
            .all(|(offset, c)| self.at(start + offset as isize) == c);
        if matches {
            self.boundary = self.end - len;
        }
        matches
    }

    /// Replace everything after `boundary` with `s`.
    fn overwrite_ending(&mut self, s: &str) {
        let mut index = (self.boundary + 1) as usize;
        for c in s.chars() {
            if index < self.chars.len() {
                self.chars[index] = c;
            } else {
                self.chars.push(c);
            }
            index += 1;
        }
        self.end = self.boundary + s.chars().count() as isize;
    }

    /// Rewrite `suffix` to `replacement` when the remaining stem has a
    /// positive consonant-sequence count.
    fn replace_ending(&mut self, suffix: &str, replacement: &str) -> bool {
        if self.ends_with(suffix) && self.consonant_sequence_count() > 0 {
            self.overwrite_ending(replacement);
            return true;
        }
        false
    }

    fn replace_first(&mut self, rules: Rules) {
        for (suffix, replacement) in rules {
            if self.replace_ending(suffix, replacement) {
                break;
            }
        }
    }
}

fn lookup<T: Copy>(table: &[(char, T)], key: char) -> Option<T> {
    table.iter().find(|(c, _)| *c == key).map(|(_, v)| *v)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
