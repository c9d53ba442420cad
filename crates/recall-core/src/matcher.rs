//! Answer grading with tolerance for missing or typed-out accents.
//!
//! Users without a convenient way to type diacritics can spell them as an
//! ASCII digraph: the base letter followed by a marker (`á` → `a'`,
//! `ñ` → `n~`, `ü` → `u^`). A response spelled that way is exact. A response
//! that only matches once every accent and marker is stripped down to the
//! base letter is "almost correct".

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Accented letter → ASCII digraph. The digraph's first char is the base letter.
static ACCENT_DIGRAPHS: &[(char, &str)] = &[
    ('á', "a'"),
    ('ä', "a^"),
    ('ć', "c'"),
    ('é', "e'"),
    ('í', "i'"),
    ('ń', "n'"),
    ('ñ', "n~"),
    ('ó', "o'"),
    ('ö', "o^"),
    ('ś', "s'"),
    ('ú', "u'"),
    ('ü', "u^"),
    ('ź', "z'"),
];

/// Outcome of grading one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// Matches the answer, accents either typed or spelled as digraphs.
    Exact,
    /// Matches only after stripping accents from both sides.
    AccentEquivalent,
    Wrong,
}

impl Grade {
    /// Exact and accent-equivalent responses both count as correct.
    pub fn is_correct(self) -> bool {
        !matches!(self, Grade::Wrong)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Exact => write!(f, "exact"),
            Grade::AccentEquivalent => write!(f, "accent-equivalent"),
            Grade::Wrong => write!(f, "wrong"),
        }
    }
}

/// Grade `input` against the canonical `answer`.
pub fn grade(input: &str, answer: &str) -> Grade {
    let input = fold(input);
    let answer = fold(answer);

    if input == answer || input == to_digraphs(&answer) {
        Grade::Exact
    } else if strip_accents(&input) == strip_accents(&answer) {
        Grade::AccentEquivalent
    } else {
        Grade::Wrong
    }
}

/// Trim, compose (so `e` + U+0301 becomes `é`) and lowercase.
fn fold(s: &str) -> String {
    s.trim().nfc().collect::<String>().to_lowercase()
}

/// Replace every accented letter from the table with its digraph.
pub fn to_digraphs(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match digraph_for(c) {
            Some(digraph) => out.push_str(digraph),
            None => out.push(c),
        }
    }
    out
}

/// Reduce accented letters and digraphs alike to their base letter.
pub fn strip_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(digraph) = digraph_for(c) {
            out.push(base_of(digraph));
            continue;
        }
        out.push(c);
        if let Some(&next) = chars.peek() {
            if is_digraph(c, next) {
                chars.next();
            }
        }
    }

    out
}

fn digraph_for(c: char) -> Option<&'static str> {
    ACCENT_DIGRAPHS
        .iter()
        .find(|(accented, _)| *accented == c)
        .map(|(_, digraph)| *digraph)
}

fn base_of(digraph: &str) -> char {
    digraph.chars().next().unwrap_or_default()
}

fn is_digraph(base: char, marker: char) -> bool {
    ACCENT_DIGRAPHS.iter().any(|(_, digraph)| {
        let mut chars = digraph.chars();
        chars.next() == Some(base) && chars.next() == Some(marker)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_match_is_exact() {
        assert_eq!(grade("hello", "hello"), Grade::Exact);
        assert_eq!(grade("  Hello \n", "hello"), Grade::Exact);
        assert_eq!(grade("HELLO", "Hello"), Grade::Exact);
    }

    #[test]
    fn typed_accents_are_exact() {
        assert_eq!(grade("café", "café"), Grade::Exact);
        assert_eq!(grade("CAFÉ", "café"), Grade::Exact);
    }

    #[test]
    fn digraph_spelling_is_exact() {
        assert_eq!(grade("cafe'", "café"), Grade::Exact);
        assert_eq!(grade("man~ana", "mañana"), Grade::Exact);
        assert_eq!(grade("u^ber", "über"), Grade::Exact);
    }

    #[test]
    fn missing_accent_is_accent_equivalent() {
        assert_eq!(grade("cafe", "café"), Grade::AccentEquivalent);
        assert_eq!(grade("manana", "mañana"), Grade::AccentEquivalent);
        assert_eq!(grade("uber", "Über"), Grade::AccentEquivalent);
    }

    #[test]
    fn wrong_accent_is_accent_equivalent() {
        // Wrong marker, right base letter.
        assert_eq!(grade("n'o", "ño"), Grade::AccentEquivalent);
        assert_eq!(grade("cafè", "café"), Grade::Wrong);
    }

    #[test]
    fn different_word_is_wrong() {
        assert_eq!(grade("coffee", "café"), Grade::Wrong);
        assert_eq!(grade("cafa", "café"), Grade::Wrong);
    }

    #[test]
    fn empty_input_is_wrong_unless_answer_empty() {
        assert_eq!(grade("", "hola"), Grade::Wrong);
        assert_eq!(grade("   ", "hola"), Grade::Wrong);
        assert_eq!(grade("", ""), Grade::Exact);
    }

    #[test]
    fn decomposed_input_matches_composed_answer() {
        let decomposed = "cafe\u{0301}";
        assert_eq!(grade(decomposed, "café"), Grade::Exact);
    }

    #[test]
    fn stripping_is_symmetric() {
        let pairs = [
            ("cafe", "café"),
            ("café", "cafe"),
            ("cafe'", "cafe"),
            ("niño", "nin~o"),
            ("coffee", "café"),
            ("sí", "si"),
            ("si", "no"),
        ];
        for (a, b) in pairs {
            let forward = grade(a, b);
            let backward = grade(b, a);
            assert_eq!(
                forward.is_correct(),
                backward.is_correct(),
                "{a:?} vs {b:?}: {forward} / {backward}"
            );
            assert_eq!(
                forward.is_correct(),
                strip_accents(&fold(a)) == strip_accents(&fold(b))
            );
        }
    }

    #[test]
    fn strip_accents_handles_both_spellings() {
        assert_eq!(strip_accents("ñandú"), "nandu");
        assert_eq!(strip_accents("n~andu'"), "nandu");
        assert_eq!(strip_accents("ź"), "z");
        // A lone marker is left alone.
        assert_eq!(strip_accents("'a"), "'a");
    }

    #[test]
    fn to_digraphs_replaces_every_accent() {
        assert_eq!(to_digraphs("árbol"), "a'rbol");
        assert_eq!(to_digraphs("pingüino"), "pingu^ino");
        assert_eq!(to_digraphs("plain"), "plain");
    }

    #[test]
    fn grade_correctness() {
        assert!(Grade::Exact.is_correct());
        assert!(Grade::AccentEquivalent.is_correct());
        assert!(!Grade::Wrong.is_correct());
    }
}
