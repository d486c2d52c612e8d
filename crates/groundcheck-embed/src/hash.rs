//! Hashed bag-of-words embedder.
//!
//! Deterministic and dependency-free: tokens are hashed into a fixed
//! number of buckets and the resulting count vector is L2-normalized, so
//! cosine similarity reflects lexical token overlap. Useful for tests,
//! CI, and smoke runs where downloading an ONNX model is unwanted. It is
//! not a semantic model and is never substituted for one implicitly.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::warn;

use groundcheck_core::embedder::{EmbedError, Embedding, TextEmbedder};

/// Bucket count mirroring the dimensionality of small sentence-embedding
/// models.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Lexical-overlap embedder over hashed token buckets.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Embedder with `dimensions` buckets. More buckets means fewer
    /// token collisions. A zero bucket count falls back to the default
    /// with a warning; `bucket` divides by the count.
    pub fn new(dimensions: usize) -> Self {
        if dimensions == 0 {
            warn!("bucket count must be positive, using {DEFAULT_DIMENSIONS}");
            return Self {
                dimensions: DEFAULT_DIMENSIONS,
            };
        }
        Self { dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % self.dimensions as u64) as usize
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[self.bucket(&token.to_lowercase())] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 1e-9 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl TextEmbedder for HashEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundcheck_core::cosine_similarity;
    use proptest::prelude::*;

    #[test]
    fn test_identical_texts_embed_identically() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("The cat sat on the mat.").unwrap();
        let b = embedder.embed("The cat sat on the mat.").unwrap();
        assert_eq!(a, b);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_tokenization_ignores_case_and_punctuation() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("Paris, is the CAPITAL!").unwrap();
        let b = embedder.embed("paris is the capital").unwrap();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_disjoint_texts_score_near_zero() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("alpha beta gamma").unwrap();
        let b = embedder.embed("delta epsilon zeta").unwrap();
        // Bucket collisions can contribute a little mass but not much.
        assert!(cosine_similarity(&a, &b) < 0.5);
    }

    #[test]
    fn test_overlap_scores_between_extremes() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("shared words here plus extra").unwrap();
        let b = embedder.embed("shared words here").unwrap();
        let sim = cosine_similarity(&a, &b);
        assert!(sim > 0.5 && sim < 1.0, "got {sim}");
    }

    #[test]
    fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(v.len(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_default_matches_advertised_dimensions() {
        assert_eq!(HashEmbedder::default().dimensions(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_zero_buckets_fall_back_to_default() {
        let embedder = HashEmbedder::new(0);
        assert_eq!(embedder.dimensions(), DEFAULT_DIMENSIONS);
        // The bucket math stays well defined.
        assert_eq!(embedder.embed("token").unwrap().len(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_vectors_are_unit_norm() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("one two three four").unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_embeddings_have_fixed_dimension_and_bounded_norm(
            text in "\\PC{0,120}",
            dims in 1usize..512,
        ) {
            let embedder = HashEmbedder::new(dims);
            let v = embedder.embed(&text).unwrap();
            prop_assert_eq!(v.len(), dims);
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assert!(norm < 1.0 + 1e-4);
        }

        #[test]
        fn prop_self_similarity_is_one_for_token_bearing_text(
            text in "[a-z]{1,8}( [a-z]{1,8}){0,10}",
        ) {
            let embedder = HashEmbedder::default();
            let v = embedder.embed(&text).unwrap();
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
        }
    }
}
