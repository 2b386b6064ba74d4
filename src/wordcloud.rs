// src/wordcloud.rs
// Word-frequency extraction over vacancy free text. The filter is a
// deliberate allowlist/denylist pair: the length filter would discard
// short high-value acronyms ("ai", "qa"), so the technical-term
// allowlist exists specifically to rescue them; the Russian stopword
// set removes the connective noise the length filter lets through.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Technical-term allowlist (languages, frameworks, tools), matched
/// case-insensitively against whole tokens.
static TECH_TERMS: Lazy<HashSet<String>> = Lazy::new(|| {
    let raw = include_str!("../tech_terms.json");
    let terms: Vec<String> = serde_json::from_str(raw).expect("valid tech term list");
    terms.into_iter().map(|t| t.to_lowercase()).collect()
});

/// Russian stopword denylist.
static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    let raw = include_str!("../stopwords_ru.json");
    serde_json::from_str::<Vec<String>>(raw)
        .expect("valid stopword list")
        .into_iter()
        .collect()
});

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));

// Keep Latin/Cyrillic letters, digits, whitespace and + # . so tokens
// like "c++", "c#" and "node.js" survive.
static RE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Zа-яА-ЯёЁ0-9\s+#.]").expect("noise regex"));

/// How many tokens the word cloud keeps.
pub const WORD_CLOUD_LIMIT: usize = 50;

/// Normalize free text for tokenization: decode entities, strip markup,
/// blank out everything outside the kept character set, lowercase, and
/// collapse whitespace runs.
pub fn clean_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    let spaced = RE_NOISE.replace_all(&stripped, " ");
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn retained(token: &str) -> bool {
    if TECH_TERMS.contains(token) {
        return true;
    }
    token.chars().count() > 2 && !STOPWORDS.contains(token)
}

#[derive(Debug, Clone, Copy)]
struct TokenEntry {
    count: u64,
    first_seen: u64,
}

/// Incremental token counter with deterministic ranking: descending
/// frequency, ties broken by first-encountered order.
#[derive(Debug, Default)]
pub struct WordFrequency {
    counts: HashMap<String, TokenEntry>,
    next_seq: u64,
}

impl WordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize one text fragment and accumulate its retained tokens.
    pub fn observe(&mut self, text: &str) {
        for token in clean_text(text).split_whitespace() {
            if !retained(token) {
                continue;
            }
            match self.counts.get_mut(token) {
                Some(entry) => entry.count += 1,
                None => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    self.counts.insert(
                        token.to_string(),
                        TokenEntry {
                            count: 1,
                            first_seen: seq,
                        },
                    );
                }
            }
        }
    }

    /// Top `n` tokens by descending count. Which tokens make the cut is
    /// deterministic; the returned mapping itself is unordered.
    pub fn top(&self, n: usize) -> BTreeMap<String, u64> {
        let mut ranked: Vec<(&String, &TokenEntry)> = self.counts.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(token, entry)| (token.clone(), entry.count))
            .collect()
    }
}

/// One-shot frequency table over a batch of texts; the batch equivalent
/// of feeding every text through one `WordFrequency`.
pub fn frequencies<S: AsRef<str>>(texts: &[S]) -> BTreeMap<String, u64> {
    let mut freq = WordFrequency::new();
    for t in texts {
        freq.observe(t.as_ref());
    }
    freq.top(WORD_CLOUD_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_markup_and_noise() {
        let s = "Опыт с <highlighttext>Python</highlighttext>, знание C++ &amp; C#!";
        assert_eq!(clean_text(s), "опыт с python знание c++ c#");
    }

    #[test]
    fn allowlist_rescues_short_acronyms() {
        let freq = frequencies(&["нужен QA и ai инженер"]);
        assert_eq!(freq.get("qa"), Some(&1));
        assert_eq!(freq.get("ai"), Some(&1));
        // "и" is a stopword of length 1, "с" never appears; the plain
        // short token must not leak through.
        assert!(!freq.contains_key("и"));
    }

    #[test]
    fn stopwords_and_short_tokens_are_dropped() {
        let freq = frequencies(&["мы ищем разработчика для команды"]);
        assert!(!freq.contains_key("мы"));
        assert!(!freq.contains_key("для"));
        assert_eq!(freq.get("разработчика"), Some(&1));
        assert_eq!(freq.get("команды"), Some(&1));
    }

    #[test]
    fn dotted_and_symbol_tokens_survive() {
        let freq = frequencies(&["node.js c++ c# .net backend"]);
        for token in ["node.js", "c++", "c#", ".net", "backend"] {
            assert_eq!(freq.get(token), Some(&1), "missing {token}");
        }
    }

    #[test]
    fn ranking_is_count_then_first_encountered() {
        let mut freq = WordFrequency::new();
        freq.observe("python rust python");
        freq.observe("docker rust");
        let top = freq.top(2);
        // python=2, rust=2, docker=1; rust was seen before docker and
        // ties with python on nothing — the top-2 cut keeps the two
        // highest counts.
        assert_eq!(top.len(), 2);
        assert_eq!(top.get("python"), Some(&2));
        assert_eq!(top.get("rust"), Some(&2));
    }

    #[test]
    fn tie_break_prefers_first_encountered() {
        let mut freq = WordFrequency::new();
        // All counts equal; only the first WORD_CLOUD_LIMIT distinct
        // tokens may survive, in encounter order.
        for i in 0..60 {
            freq.observe(&format!("token{i:02}"));
        }
        let top = freq.top(WORD_CLOUD_LIMIT);
        assert_eq!(top.len(), WORD_CLOUD_LIMIT);
        assert!(top.contains_key("token00"));
        assert!(top.contains_key("token49"));
        assert!(!top.contains_key("token50"));
    }

    #[test]
    fn output_is_bounded_at_fifty() {
        let texts: Vec<String> = (0..80).map(|i| format!("word{i}")).collect();
        let freq = frequencies(&texts);
        assert_eq!(freq.len(), WORD_CLOUD_LIMIT);
    }
}
