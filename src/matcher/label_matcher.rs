use serde::Serialize;

use crate::matcher::data::DataDictionary;

/// Tunable matcher constants. The tier scores and word-overlap cut points
/// are empirically tuned; keeping them here rather than inline makes them
/// adjustable without touching the scoring logic.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Case-insensitive exact equality between key and label.
    pub exact: u8,
    /// Equality after normalization, punctuation and spacing removed.
    pub normalized: u8,
    /// One raw string is a substring of the other.
    pub substring: u8,
    /// Every word of one side appears inside some word of the other.
    pub word_subset: u8,
    /// At least `strong_ratio` of the key's words partially match.
    pub strong_overlap: u8,
    /// At least `weak_ratio` of the key's words partially match.
    pub weak_overlap: u8,
    /// A single word longer than `long_word_len` appears in the other string.
    pub long_word: u8,
    /// Any exact single-word overlap between the two word sets.
    pub shared_word: u8,

    pub strong_ratio: f64,
    pub weak_ratio: f64,
    /// Words of this length or shorter are dropped before word comparisons.
    pub min_word_len: usize,
    /// Minimum length (exclusive) for the single-long-word tier.
    pub long_word_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            exact: 100,
            normalized: 95,
            substring: 60,
            word_subset: 55,
            strong_overlap: 50,
            weak_overlap: 45,
            long_word: 40,
            shared_word: 35,
            strong_ratio: 0.7,
            weak_ratio: 0.5,
            min_word_len: 2,
            long_word_len: 3,
        }
    }
}

/// Outcome of matching one field label against a data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched_key: Option<String>,
    pub matched_value: Option<String>,
    /// 0-100; tier score of the best key, 0 when nothing matched.
    pub score: u8,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            matched_key: None,
            matched_value: None,
            score: 0,
        }
    }

    /// Callers apply their own confidence floor; anything below it should be
    /// treated as "no reliable match".
    pub fn is_reliable(&self, floor: u8) -> bool {
        self.matched_key.is_some() && self.score >= floor
    }
}

/// Find the data key that best matches a field label.
///
/// Scans the dictionary once, left to right, keeping the maximum score seen.
/// The first key reaching the maximum wins, so the result is deterministic
/// given the dictionary's insertion order.
pub fn best_match(field_label: &str, data: &DataDictionary) -> MatchResult {
    best_match_with(field_label, data, &MatcherConfig::default())
}

pub fn best_match_with(
    field_label: &str,
    data: &DataDictionary,
    config: &MatcherConfig,
) -> MatchResult {
    let mut best = MatchResult::none();

    for (key, value) in data.iter() {
        let score = score_pair(field_label, key, config);
        if score > best.score {
            best = MatchResult {
                matched_key: Some(key.to_string()),
                matched_value: Some(value.to_string()),
                score,
            };
        }
    }

    best
}

/// Score one (label, key) pair through the tier ladder, highest tier first.
pub fn score_pair(label: &str, key: &str, config: &MatcherConfig) -> u8 {
    let label = label.trim();
    let key = key.trim();
    if label.is_empty() || key.is_empty() {
        return 0;
    }

    if label.eq_ignore_ascii_case(key) {
        return config.exact;
    }

    let label_norm = normalize(label);
    let key_norm = normalize(key);
    if compact(&label_norm) == compact(&key_norm) {
        return config.normalized;
    }

    let label_lower = label.to_lowercase();
    let key_lower = key.to_lowercase();
    if label_lower.contains(&key_lower) || key_lower.contains(&label_lower) {
        return config.substring;
    }

    let label_words = split_words(&label_norm, config.min_word_len);
    let key_words = split_words(&key_norm, config.min_word_len);

    if all_words_contained(&key_words, &label_words)
        || all_words_contained(&label_words, &key_words)
    {
        return config.word_subset;
    }

    if !key_words.is_empty() {
        let partial = key_words
            .iter()
            .filter(|kw| label_words.iter().any(|lw| partial_match(kw, lw)))
            .count();
        let ratio = partial as f64 / key_words.len() as f64;
        if ratio >= config.strong_ratio {
            return config.strong_overlap;
        }
        if ratio >= config.weak_ratio {
            return config.weak_overlap;
        }
    }

    let long_word_hit = key_words
        .iter()
        .any(|kw| kw.len() > config.long_word_len && label_lower.contains(kw.as_str()))
        || label_words
            .iter()
            .any(|lw| lw.len() > config.long_word_len && key_lower.contains(lw.as_str()));
    if long_word_hit {
        return config.long_word;
    }

    if key_words.iter().any(|kw| label_words.contains(kw)) {
        return config.shared_word;
    }

    0
}

/// Lowercase, strip apostrophes, turn hyphens/underscores into spaces, and
/// collapse runs of whitespace.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\'' | '\u{2019}' => {}
            '-' | '_' => out.push(' '),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split a normalized string into comparison words, discarding short ones
/// (articles and prepositions add noise, not signal).
fn split_words(normalized: &str, min_word_len: usize) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter(|w| w.len() > min_word_len)
        .map(|w| w.to_string())
        .collect()
}

/// Every word of `needles` appears as a substring of some word in `haystack`.
fn all_words_contained(needles: &[String], haystack: &[String]) -> bool {
    !needles.is_empty()
        && needles
            .iter()
            .all(|n| haystack.iter().any(|h| h.contains(n.as_str())))
}

fn partial_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
