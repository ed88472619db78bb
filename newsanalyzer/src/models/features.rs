// Readability features derived from raw text
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Column order used when features are concatenated into a model row.
pub const FEATURE_COLUMNS: [&str; 4] = [
    "flesch_kincaid",
    "dale_chall",
    "sentence_length_ratio",
    "complex_word_ratio",
];

/// Tokens longer than this many characters count as complex words
const COMPLEX_WORD_MIN_CHARS: usize = 7;

/// Dale-Chall adds this constant when more than 5% of the words are difficult
const DALE_CHALL_ADJUSTMENT: f64 = 3.6365;

static FAMILIAR_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| include_str!("familiar_words.txt").split_whitespace().collect());

/// Readability features of a text, serialized as a name -> value map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub flesch_kincaid: f64,
    pub dale_chall: f64,
    pub sentence_length_ratio: f64,
    pub complex_word_ratio: f64,
}

impl FeatureVector {
    /// Compute all features for `text`. Pure and deterministic; every value is finite.
    pub fn extract(text: &str) -> Self {
        let tokens = text.split_whitespace().count().max(1) as f64;
        let complex = text
            .split_whitespace()
            .filter(|t| t.chars().count() >= COMPLEX_WORD_MIN_CHARS)
            .count() as f64;
        let segments = sentence_segments(text);

        let words = words(text);
        let word_count = words.len().max(1) as f64;
        let sentence_count = segments.max(1) as f64;
        let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
        let difficult = words
            .iter()
            .filter(|w| is_difficult(w))
            .count() as f64;

        let words_per_sentence = word_count / sentence_count;
        let flesch_kincaid = 0.39 * words_per_sentence + 11.8 * (syllables as f64 / word_count) - 15.59;

        let difficult_pct = difficult / word_count * 100.0;
        let mut dale_chall = 0.1579 * difficult_pct + 0.0496 * words_per_sentence;
        if difficult_pct > 5.0 {
            dale_chall += DALE_CHALL_ADJUSTMENT;
        }

        Self {
            flesch_kincaid,
            dale_chall,
            sentence_length_ratio: segments as f64 / tokens,
            complex_word_ratio: complex / tokens,
        }
    }

    /// Values in `FEATURE_COLUMNS` order.
    pub fn columns(&self) -> [f64; 4] {
        [
            self.flesch_kincaid,
            self.dale_chall,
            self.sentence_length_ratio,
            self.complex_word_ratio,
        ]
    }
}

/// Number of non-empty segments between sentence terminators.
fn sentence_segments(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Alphabetic words, lowercased. Apostrophes stay inside words ("don't").
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn is_difficult(word: &str) -> bool {
    !FAMILIAR_WORDS.contains(word) && count_syllables(word) >= 2
}

/// Vowel-group syllable estimate, with silent trailing "e" removed.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars().filter(|c| c.is_alphabetic()) {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    if count > 1 && word.ends_with('e') && !word.ends_with("le") {
        count -= 1;
    }
    count.max(1)
}
