//! Lightweight tokenization for note comparison.
//!
//! Punctuation (Chinese and Latin) and whitespace collapse to token
//! boundaries; tokens shorter than two characters are dropped. There is no
//! word segmentation, so an unbroken CJK run is a single token.

use std::collections::{HashMap, HashSet};

use crate::defaults::{CONTENT_KEYWORD_LIMIT, CONTENT_KEYWORD_MIN_FREQ, MIN_TOKEN_CHARS};

/// Characters treated as token boundaries in addition to whitespace.
pub const PUNCTUATION: &[char] = &[
    // Chinese
    '，', '。', '！', '？', '；', '：', '、', '“', '”', '‘', '’', '（', '）', '【', '】', '《',
    '》', '〈', '〉', '「', '」', '…', '—', '·',
    // Latin
    ',', '.', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}', '<', '>',
];

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

/// Split text into tokens of at least two characters, in order, duplicates kept.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(is_boundary)
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Distinct tokens in first-seen order.
pub fn unique_tokens(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Tokens occurring at least twice, in first-seen order, capped at ten.
pub fn content_keywords(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in &tokens {
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            order.push(token.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|t| counts.get(t).copied().unwrap_or(0) >= CONTENT_KEYWORD_MIN_FREQ)
        .take(CONTENT_KEYWORD_LIMIT)
        .map(str::to_string)
        .collect()
}

/// Number of distinct elements of `a` that also appear in `b`.
pub fn overlap_count<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    let other: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    let mut counted = HashSet::new();
    a.iter()
        .map(AsRef::as_ref)
        .filter(|item| other.contains(item) && counted.insert(*item))
        .count()
}
