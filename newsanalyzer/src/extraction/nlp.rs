// Keyword ranking, extractive summary and language code helpers
use std::collections::{HashMap, HashSet};

use super::stopwords;

/// Sentences scored below this many words are usually captions or bylines
const MIN_SUMMARY_SENTENCE_WORDS: usize = 4;
const IDEAL_SENTENCE_WORDS: f64 = 20.0;

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn is_keyword_candidate(word: &str, stop: &HashSet<&str>) -> bool {
    word.chars().count() > 2 && !stop.contains(word) && !word.chars().all(|c| c.is_numeric())
}

/// Most frequent non-stopword terms, highest count first; ties keep first occurrence.
/// `language` is a primary subtag and selects the stopword list.
pub fn keywords(text: &str, language: &str, max: usize) -> Vec<String> {
    let stop = stopwords::for_language(language);
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, word) in words(text).into_iter().enumerate() {
        if is_keyword_candidate(&word, stop) {
            counts.entry(word).or_insert((0, pos)).0 += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(max).map(|(word, _, _)| word).collect()
}

/// Split on line breaks and on `.`, `!`, `?` followed by whitespace, keeping terminators.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            let at_boundary = chars.peek().map_or(true, |n| n.is_whitespace());
            if matches!(c, '.' | '!' | '?') && at_boundary {
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                current.clear();
            }
        }
        let rest = current.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
    }
    sentences
}

/// Pick the `max_sentences` best sentences and return them in reading order.
///
/// Sentences are scored on title overlap, keyword density, position in the
/// article and closeness to a typical news sentence length.
pub fn summarize(title: &str, text: &str, language: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let stop = stopwords::for_language(language);
    let title_words: HashSet<String> = words(title)
        .into_iter()
        .filter(|w| is_keyword_candidate(w, stop))
        .collect();
    let top_keywords = keywords(text, language, 10);
    let keyword_weight: HashMap<&str, f64> = top_keywords
        .iter()
        .enumerate()
        .map(|(rank, w)| (w.as_str(), 1.0 - rank as f64 / top_keywords.len().max(1) as f64 * 0.5))
        .collect();

    let total = sentences.len() as f64;
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let sentence_words = words(sentence);
            let len = sentence_words.len();
            if len < MIN_SUMMARY_SENTENCE_WORDS {
                return (i, f64::NEG_INFINITY);
            }
            let title_overlap = sentence_words.iter().filter(|w| title_words.contains(*w)).count() as f64
                / title_words.len().max(1) as f64;
            let keyword_density = sentence_words
                .iter()
                .filter_map(|w| keyword_weight.get(w.as_str()))
                .sum::<f64>()
                / len as f64;
            let position = 1.0 - i as f64 / total;
            let length = (1.0 - (IDEAL_SENTENCE_WORDS - len as f64).abs() / IDEAL_SENTENCE_WORDS).max(0.0);
            (i, 1.5 * title_overlap + 2.0 * keyword_density + position + 0.5 * length)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut chosen: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce a language tag ("fr-FR", "en_US", "EN") to its lowercased primary subtag.
pub fn normalize_language(tag: &str) -> Option<String> {
    let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
    let valid = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    valid.then_some(primary)
}
