//! # groundcheck-embed
//!
//! Embedding backends for groundcheck.
//!
//! `groundcheck-core` scores claims through the `TextEmbedder` trait and
//! never names a concrete backend. This crate supplies the backends: a
//! local ONNX model behind the `fastembed` feature, a deterministic
//! hashed bag-of-words embedder, a factory/registry for selecting one by
//! name, and a lazy handle that defers backend construction to the first
//! scoring call.
//!
//! ## Important
//!
//! The `fastembed` feature is off by default. Without it the only real
//! backend is `hash`, which measures lexical overlap, not meaning; it
//! exists for tests and smoke runs and must be selected explicitly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use groundcheck_core::SupportScorer;
//! use groundcheck_embed::{EmbedderRegistry, LazyEmbedder};
//!
//! let lazy = LazyEmbedder::from_registry(
//!     EmbedderRegistry::with_defaults(),
//!     "fastembed",
//!     serde_json::json!({ "model": "all-minilm-l6-v2" }),
//! );
//! // No model has been fetched yet; that happens on the first score.
//! let scorer = SupportScorer::new(Arc::new(lazy));
//! ```

mod factory;
mod hash;
mod lazy;

#[cfg(feature = "fastembed")]
mod fastembed;

pub use factory::{EmbedderFactory, EmbedderRegistry, FactoryError, HashEmbedderFactory};
pub use hash::{HashEmbedder, DEFAULT_DIMENSIONS};
pub use lazy::LazyEmbedder;

#[cfg(feature = "fastembed")]
pub use crate::fastembed::{FastEmbedder, FastEmbedderFactory, DEFAULT_MODEL_NAME};
