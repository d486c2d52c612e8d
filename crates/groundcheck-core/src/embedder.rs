//! Embedding capability consumed by the support scorer.
//!
//! The scorer never talks to a concrete backend; it is handed something
//! that can map text to fixed-dimension vectors. Backends live in
//! `groundcheck-embed`, and tests substitute fakes.

use thiserror::Error;

/// A fixed-dimension vector representing a text. Owned transiently by a
/// scoring call; never persisted.
pub type Embedding = Vec<f32>;

/// Errors from embedding backends.
#[derive(Error, Debug, Clone)]
pub enum EmbedError {
    /// The backend cannot be initialized: not compiled in, model files
    /// missing, or the runtime failed to load. Raised on first real use,
    /// never at construction time.
    #[error(
        "embedding provider unavailable: {reason}. Enable a backend \
         (e.g. build with `--features fastembed`) or select another provider"
    )]
    ProviderUnavailable { reason: String },

    /// The backend was initialized but an embedding call failed.
    #[error("embedding backend error: {message}")]
    Backend { message: String },

    /// The backend returned a different number of vectors than texts.
    #[error("embedding batch shape mismatch: expected {expected} vectors, got {actual}")]
    BatchShape { expected: usize, actual: usize },
}

impl EmbedError {
    /// Provider-unavailable error with a reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            reason: reason.into(),
        }
    }

    /// Backend failure with a message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic for identical input under the
/// same model identifier. Calls are synchronous: the embedding round-trip
/// is the only blocking point in the scoring pipeline, and callers own
/// any timeout or cancellation policy.
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts in a single backend round-trip.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let batch = [text.to_string()];
        self.embed_batch(&batch)?
            .into_iter()
            .next()
            .ok_or(EmbedError::BatchShape {
                expected: 1,
                actual: 0,
            })
    }

    /// Identifier of this embedder (provider or model label), for logs
    /// and scored-record metadata.
    fn name(&self) -> &str;
}

/// Cosine similarity between two vectors, clamped to [-1, 1].
///
/// Returns 0.0 when either vector has (near-)zero norm, where the ratio
/// is undefined. Both vectors must have the same dimension.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "embedding dimensions must match");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a < 1e-9 || norm_b < 1e-9 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vec![0.3, -0.5, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let a = vec![1.0, 2.0, -3.0];
        let b: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-4);
    }

    #[test]
    fn test_zero_norm_vector_scores_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_default_embed_delegates_to_batch() {
        struct Doubler;

        impl TextEmbedder for Doubler {
            fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
                Ok(texts.iter().map(|t| vec![t.len() as f32 * 2.0]).collect())
            }

            fn name(&self) -> &str {
                "doubler"
            }
        }

        assert_eq!(Doubler.embed("abc").unwrap(), vec![6.0]);
    }

    proptest! {
        #[test]
        fn prop_cosine_stays_in_unit_interval(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8),
        ) {
            let sim = cosine_similarity(&a, &b);
            prop_assert!((-1.0..=1.0).contains(&sim));
        }

        #[test]
        fn prop_cosine_is_symmetric(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8),
        ) {
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-6);
        }
    }
}
