//! Text normalization and lexical similarity.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\s]").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, drop punctuation, collapse whitespace, trim.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = RE_NON_WORD.replace_all(&lowered, "");
    RE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Similarity of two free-text strings in `[0, 1]`.
///
/// Equal normalized strings score 1.0. A containment match scores at least
/// 0.8. Otherwise the score is the count of shared words (longer than one
/// character) over the word count of the longer text, boosted by 20% when at
/// least two words are shared and the base score exceeds 0.3.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_text(a);
    let b = normalize_text(b);

    if a == b {
        return 1.0;
    }

    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        let (a_len, b_len) = (text_len(&a), text_len(&b));
        let (shorter, longer) = if a_len < b_len { (a_len, b_len) } else { (b_len, a_len) };
        return (shorter as f64 / longer as f64).max(0.8);
    }

    let words_a = significant_words(&a);
    let words_b = significant_words(&b);
    if words_a.is_empty() && words_b.is_empty() {
        return 1.0;
    }
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let lookup_b: HashSet<&str> = words_b.iter().copied().collect();
    let common: HashSet<&str> = words_a.iter().copied().filter(|w| lookup_b.contains(w)).collect();
    let total = words_a.len().max(words_b.len());
    let similarity = common.len() as f64 / total as f64;

    if common.len() >= 2 && similarity > 0.3 {
        (similarity * 1.2).min(1.0)
    } else {
        similarity
    }
}

/// Length in UTF-16 code units, so text outside the BMP (emoji) counts
/// two units per character.
pub(crate) fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn significant_words(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|w| text_len(w) > 1).collect()
}

/// Jaccard index of two string lists after normalization.
pub fn array_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let set_a: HashSet<String> = a.iter().map(|s| normalize_text(s)).collect();
    let set_b: HashSet<String> = b.iter().map(|s| normalize_text(s)).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 { 0.0 } else { intersection as f64 / union as f64 }
}
