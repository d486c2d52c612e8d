//! Answer-level metrics built on claim extraction and support scoring.
//!
//! Two aggregates per answer: the unsupported-claim rate (fraction of
//! claims that fail the support threshold) and faithfulness (mean support
//! score across claims). Both share the zero-claims conventions described
//! on [`UcrScore`] and [`faithfulness_score`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claims::extract_claims;
use crate::embedder::EmbedError;
use crate::scorer::{SupportScorer, DEFAULT_SUPPORT_THRESHOLD};

/// Unsupported-claim rate for one answer.
///
/// An answer with zero claims reports `(0.0, 0, 0)`: having asserted
/// nothing, it cannot be penalized for lacking support. This is a
/// deliberate convention, not a missing-data default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UcrScore {
    /// `unsupported / total`, in [0, 1]. 0.0 when there are no claims.
    pub rate: f32,
    /// Claims whose best support score fell below the threshold.
    pub unsupported: usize,
    /// Claims extracted from the answer.
    pub total: usize,
}

impl UcrScore {
    /// Result for an answer that yields no claims.
    pub const EMPTY: UcrScore = UcrScore {
        rate: 0.0,
        unsupported: 0,
        total: 0,
    };
}

/// Both aggregate metrics from a single scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerScores {
    pub ucr: UcrScore,
    /// Mean support score across claims; 1.0 for a zero-claims answer
    /// ("nothing asserted, nothing contradicted").
    pub faithfulness: f32,
}

/// A blank or absent context scores against an empty context set, which
/// is treated identically to "no context".
fn context_set(context: Option<&str>) -> Vec<String> {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => vec![ctx.to_string()],
        _ => Vec::new(),
    }
}

/// Score an answer against its context, producing both aggregate metrics
/// from one batched embedding pass.
///
/// `threshold` only affects the unsupported-claim rate; faithfulness is
/// threshold-free.
pub fn score_answer(
    scorer: &SupportScorer,
    answer: &str,
    context: Option<&str>,
    threshold: f32,
) -> Result<AnswerScores, EmbedError> {
    let claims = extract_claims(answer);
    if claims.is_empty() {
        return Ok(AnswerScores {
            ucr: UcrScore::EMPTY,
            faithfulness: 1.0,
        });
    }

    let contexts = context_set(context);
    let scores = scorer.support_scores(&claims, &contexts)?;

    let total = claims.len();
    let unsupported = scores.iter().filter(|score| **score < threshold).count();
    let rate = unsupported as f32 / total as f32;
    let faithfulness = scores.iter().sum::<f32>() / total as f32;

    debug!(
        total,
        unsupported,
        rate,
        faithfulness,
        threshold,
        "aggregated answer metrics"
    );

    Ok(AnswerScores {
        ucr: UcrScore {
            rate,
            unsupported,
            total,
        },
        faithfulness,
    })
}

/// Unsupported-claim rate for one answer. See [`UcrScore`] for the
/// zero-claims convention.
pub fn score_answer_ucr(
    scorer: &SupportScorer,
    answer: &str,
    context: Option<&str>,
    threshold: f32,
) -> Result<UcrScore, EmbedError> {
    Ok(score_answer(scorer, answer, context, threshold)?.ucr)
}

/// Mean support score across an answer's claims; 1.0 when the answer
/// yields no claims.
pub fn faithfulness_score(
    scorer: &SupportScorer,
    answer: &str,
    context: Option<&str>,
) -> Result<f32, EmbedError> {
    Ok(score_answer(scorer, answer, context, DEFAULT_SUPPORT_THRESHOLD)?.faithfulness)
}
