//! Frequency-based theme summary over retrieved chunk text.
//!
//! This is a word-count heuristic, not topic modelling. Ranking is by count,
//! ties broken by the position of the word's first occurrence, so the output
//! is stable for a given input but shifts with tokenization details.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub const THEME_COUNT: usize = 10;
const MIN_THEME_WORD_CHARS: usize = 4;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

pub fn summarize_themes(question: &str, texts: &[&str]) -> String {
    format!(
        "{question} - common themes: {}",
        top_themes(texts, THEME_COUNT).join(", ")
    )
}

pub fn top_themes(texts: &[&str], limit: usize) -> Vec<String> {
    let combined = texts.join(" ").to_lowercase();

    // word -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, m) in WORD.find_iter(&combined).enumerate() {
        counts.entry(m.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(word, _)| word.chars().count() >= MIN_THEME_WORD_CHARS)
        .map(|(word, (count, first))| (word, count, first))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
