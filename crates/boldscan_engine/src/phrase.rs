//! Length and pattern rules that decide whether bold text is a phrase.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Phrases must be strictly longer than this many characters.
pub const MIN_PHRASE_CHARS: usize = 2;
/// Phrases must have strictly fewer whitespace-separated tokens than this.
pub const MAX_PHRASE_TOKENS: usize = 8;

static EXCLUDED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@|#|http|\d{4,}").expect("static regex"));

static RELATIVE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+\s*(day|hour|minute)s?$").expect("static regex")
});

/// Returns true when trimmed `text` qualifies as a phrase.
pub fn accepts(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() <= MIN_PHRASE_CHARS {
        return false;
    }
    if text.split_whitespace().count() >= MAX_PHRASE_TOKENS {
        return false;
    }
    !EXCLUDED_PATTERN.is_match(text) && !RELATIVE_TIME.is_match(text)
}

/// Deduplicating collector that keeps first-insertion order.
#[derive(Debug, Default)]
pub struct PhraseSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl PhraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims and filters `text`; returns true if it was added.
    pub fn insert(&mut self, text: &str) -> bool {
        let text = text.trim();
        if !accepts(text) || self.seen.contains(text) {
            return false;
        }
        self.seen.insert(text.to_string());
        self.ordered.push(text.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_phrases(self) -> Vec<String> {
        self.ordered
    }
}
