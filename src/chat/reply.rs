//! Reply post-processing

use std::sync::LazyLock;

use regex::Regex;

/// A sentence ends at `.`, `!` or `?` followed by whitespace or end of text
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence pattern is a valid regex"));

/// What happens to provider text before it is returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyPolicy {
    /// Return the whole trimmed reply
    #[default]
    Full,
    /// Keep only the first N sentences
    FirstSentences(usize),
}

impl ReplyPolicy {
    /// `None` or `0` means no truncation
    pub fn from_max_sentences(max: Option<usize>) -> Self {
        match max {
            Some(n) if n > 0 => ReplyPolicy::FirstSentences(n),
            _ => ReplyPolicy::Full,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let text = text.trim();
        match *self {
            ReplyPolicy::Full => text.to_string(),
            ReplyPolicy::FirstSentences(n) => first_sentences(text, n).to_string(),
        }
    }
}

fn first_sentences(text: &str, n: usize) -> &str {
    match SENTENCE_END.find_iter(text).nth(n.saturating_sub(1)) {
        Some(end) if end.end() < text.len() => text[..end.end()].trim_end(),
        _ => text,
    }
}
