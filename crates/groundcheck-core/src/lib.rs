//! # groundcheck-core
//!
//! Claim-support scoring for model answers.
//!
//! An answer is decomposed into sentence-level claims, each claim is
//! scored against retrieved context by embedding similarity, and the
//! per-claim scores roll up into two answer-level metrics: the
//! unsupported-claim rate and mean faithfulness.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same embedder and input always produce the same scores
//! 2. **Lazy failure**: a missing embedding backend errors only when a score
//!    is actually requested, never at construction
//! 3. **Batched**: one embedding round-trip per text set, not per
//!    claim-context pair
//! 4. **Documented conventions**: a zero-claims answer reports `(0.0, 0, 0)`
//!    UCR and 1.0 faithfulness
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use groundcheck_core::{score_answer, SupportScorer, DEFAULT_SUPPORT_THRESHOLD};
//! use groundcheck_embed::HashEmbedder;
//!
//! let scorer = SupportScorer::new(Arc::new(HashEmbedder::default()));
//! let scores = score_answer(
//!     &scorer,
//!     "Paris is the capital of France. It has 50 million residents.",
//!     Some("Paris is the capital and most populous city of France."),
//!     DEFAULT_SUPPORT_THRESHOLD,
//! )?;
//! println!("ucr={:.2} faithfulness={:.2}", scores.ucr.rate, scores.faithfulness);
//! ```

pub mod claims;
pub mod embedder;
pub mod heuristic;
pub mod metrics;
pub mod scorer;

// Re-export main types at crate root
pub use claims::{extract_claims, ClaimSplitter, SentenceSplitter};
pub use embedder::{cosine_similarity, EmbedError, Embedding, TextEmbedder};
pub use heuristic::unsupported_claim;
pub use metrics::{faithfulness_score, score_answer, score_answer_ucr, AnswerScores, UcrScore};
pub use scorer::{SupportScorer, DEFAULT_SUPPORT_THRESHOLD};
