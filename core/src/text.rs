use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::post::Topic;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
}

/// Lowercase with Turkish dotted/dotless I handling. `İ` and `I` both fold to
/// `i`, and any surviving dotless `ı` is folded to `i` as well, so queries
/// typed with or without Turkish keyboard layouts land on the same text. The
/// transform is superset-safe for other scripts, so it is applied universally.
fn fold_lowercase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'İ' | 'I' | 'ı' => out.push('i'),
            _ => out.extend(ch.to_lowercase()),
        }
    }
    out
}

/// Case- and diacritic-insensitive normalization: Turkish-aware lowercasing,
/// NFKD decomposition with combining marks stripped, every run of
/// non-letter/non-digit characters collapsed to a single space, trimmed.
pub fn normalize(text: &str) -> String {
    let folded = fold_lowercase(text);
    let stripped: String = folded.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let words: Vec<&str> = TOKEN_RE.find_iter(&stripped).map(|m| m.as_str()).collect();
    words.join(" ")
}

/// Normalize and split into unique tokens, dropping tokens shorter than
/// `min_len` characters. Order of first appearance is preserved.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    let normalized = normalize(text);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tokens = Vec::new();
    for word in normalized.split(' ') {
        if word.is_empty() || word.chars().count() < min_len {
            continue;
        }
        if seen.insert(word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}

/// Build the precomputed `searchText` field for a post: id, title, summary,
/// and every topic id/name, normalized as one string. Runs at content-sync
/// time; request-time code only reads the stored value.
pub fn build_post_search_text(id: &str, title: &str, summary: &str, topics: &[Topic]) -> String {
    let mut parts: Vec<&str> = vec![id, title, summary];
    for topic in topics {
        if !topic.id.is_empty() {
            parts.push(&topic.id);
        }
        if !topic.name.is_empty() {
            parts.push(&topic.name);
        }
    }
    normalize(&parts.join(" "))
}

/// Substring match of a normalized query against a topic display name. An
/// empty query matches every topic.
pub fn topic_matches_query(topic_name: &str, query: &str) -> bool {
    let normalized_query = normalize(query);
    if normalized_query.is_empty() {
        return true;
    }
    normalize(topic_name).contains(&normalized_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_whitespace() {
        assert_eq!(normalize("  Hello,   World!! 42 "), "hello world 42");
    }

    #[test]
    fn folds_turkish_case_and_marks() {
        assert_eq!(normalize("IĞDIR ışık"), "igdir isik");
        assert_eq!(normalize("İstanbul"), "istanbul");
        assert_eq!(normalize("Güvenlik Notları"), "guvenlik notlari");
    }

    #[test]
    fn strips_latin_diacritics() {
        assert_eq!(normalize("café menü"), "cafe menu");
    }

    #[test]
    fn tokenize_dedups_and_applies_min_length() {
        let tokens = tokenize("go go Go! a rust rust", 2);
        assert_eq!(tokens, vec!["go", "rust"]);
    }

    #[test]
    fn search_text_includes_topics() {
        let topics = vec![
            Topic { id: "rust-lang".into(), name: "Rust".into(), color: String::new() },
            Topic { id: String::new(), name: String::new(), color: String::new() },
        ];
        let text = build_post_search_text("my-post", "My Post", "A summary.", &topics);
        assert_eq!(text, "my post my post a summary rust lang rust");
    }

    #[test]
    fn topic_query_matching() {
        assert!(topic_matches_query("Yapay Zekâ", "zeka"));
        assert!(topic_matches_query("Anything", ""));
        assert!(!topic_matches_query("Databases", "frontend"));
    }
}
