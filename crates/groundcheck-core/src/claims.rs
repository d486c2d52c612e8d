//! Claim extraction: splitting an answer into sentence-level claims.
//!
//! A claim is the unit the support scorer judges, approximated here as a
//! sentence. The splitter is deliberately a heuristic: it cuts at
//! whitespace that follows `.`, `?` or `!`, keeping the punctuation
//! attached to its sentence. Abbreviations ("e.g. x"), decimal numbers
//! and quoted terminal punctuation are split like any other boundary, a
//! documented limitation rather than a bug.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Sentence-ending punctuation followed by a whitespace run. The cut
    /// lands one byte into the match so the punctuation stays with the
    /// sentence it ends and the whitespace is consumed.
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.?!]\s+").unwrap();
}

/// Capability of splitting free text into an ordered list of claims.
///
/// Kept as a seam so a more linguistically accurate splitter can replace
/// the sentence heuristic without touching the scorer or the metrics.
pub trait ClaimSplitter {
    /// Split `text` into claims, in left-to-right order.
    ///
    /// Implementations must never return empty or whitespace-only claims
    /// and must preserve the non-whitespace characters of `text` in
    /// order across the returned claims.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Default splitter: sentence boundaries on terminal punctuation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentenceSplitter;

impl SentenceSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimSplitter for SentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut claims = Vec::new();
        let mut start = 0;
        for boundary in SENTENCE_BOUNDARY.find_iter(text) {
            // `[.?!]` is a single ASCII byte, so start + 1 is a char boundary.
            let cut = boundary.start() + 1;
            push_claim(&mut claims, &text[start..cut]);
            start = boundary.end();
        }
        push_claim(&mut claims, &text[start..]);
        claims
    }
}

fn push_claim(claims: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        claims.push(fragment.to_string());
    }
}

/// Extract claims from an answer with the default [`SentenceSplitter`].
///
/// Empty input yields an empty vector, never an error. Text without any
/// terminal punctuation yields exactly one claim: the trimmed text.
pub fn extract_claims(text: &str) -> Vec<String> {
    SentenceSplitter.split(text)
}
