//! Support scoring: how well each claim is grounded in retrieved context.
//!
//! A claim's support is its best cosine similarity against any single
//! context chunk. Claims backed by information spread across several
//! chunks can score low even when the answer is correct; treat scores as
//! a screening signal.

use std::sync::Arc;

use tracing::trace;

use crate::embedder::{cosine_similarity, EmbedError, TextEmbedder};

/// Similarity at or above this counts as supported.
pub const DEFAULT_SUPPORT_THRESHOLD: f32 = 0.65;

/// Scores claims against context chunks using an injected embedder.
///
/// Cloning is cheap; clones share the embedder.
#[derive(Clone)]
pub struct SupportScorer {
    embedder: Arc<dyn TextEmbedder>,
}

impl SupportScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Identifier of the underlying embedder, for logs and metadata.
    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Best similarity per claim against any single context chunk.
    ///
    /// Output has the same length and order as `claims`. With no context
    /// chunks, every claim scores 0.0 and the embedder is not called.
    /// Otherwise the embedder sees exactly two batches: all claims, then
    /// all contexts.
    pub fn support_scores(
        &self,
        claims: &[String],
        contexts: &[String],
    ) -> Result<Vec<f32>, EmbedError> {
        if claims.is_empty() {
            return Ok(Vec::new());
        }
        if contexts.is_empty() {
            return Ok(vec![0.0; claims.len()]);
        }

        let claim_vecs = self.embedder.embed_batch(claims)?;
        if claim_vecs.len() != claims.len() {
            return Err(EmbedError::BatchShape {
                expected: claims.len(),
                actual: claim_vecs.len(),
            });
        }
        let context_vecs = self.embedder.embed_batch(contexts)?;
        if context_vecs.len() != contexts.len() {
            return Err(EmbedError::BatchShape {
                expected: contexts.len(),
                actual: context_vecs.len(),
            });
        }

        let scores = claim_vecs
            .iter()
            .map(|claim_vec| {
                context_vecs
                    .iter()
                    .map(|context_vec| cosine_similarity(claim_vec, context_vec))
                    .fold(-1.0f32, f32::max)
            })
            .collect::<Vec<f32>>();

        trace!(
            claims = claims.len(),
            contexts = contexts.len(),
            embedder = self.embedder.name(),
            "scored claim support"
        );

        Ok(scores)
    }

    /// Best similarity for one claim against any single context chunk.
    /// 0.0 when there are no context chunks.
    pub fn best_support_score(
        &self,
        claim: &str,
        contexts: &[String],
    ) -> Result<f32, EmbedError> {
        let claims = [claim.to_string()];
        Ok(self.support_scores(&claims, contexts)?.first().copied().unwrap_or(0.0))
    }

    /// Whether a claim's best support score reaches `threshold`.
    pub fn is_claim_supported(
        &self,
        claim: &str,
        contexts: &[String],
        threshold: f32,
    ) -> Result<bool, EmbedError> {
        Ok(self.best_support_score(claim, contexts)? >= threshold)
    }
}
