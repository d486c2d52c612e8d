//! Zero-dependency placeholder metric, usable with no embedding backend.

/// Crude verbosity check standing in for real support scoring: flags an
/// answer more than three times longer than its context. Without a
/// context there is nothing to judge, so the answer is not flagged.
///
/// Lengths are character counts. Kept independent of [`SupportScorer`]
/// so it works with no embedding provider configured.
///
/// [`SupportScorer`]: crate::scorer::SupportScorer
pub fn unsupported_claim(answer: &str, context: Option<&str>) -> bool {
    match context {
        None => false,
        Some(ctx) => answer.chars().count() > 3 * ctx.chars().count(),
    }
}
