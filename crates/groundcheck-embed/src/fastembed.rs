//! Local ONNX embedding backend via `fastembed`.
//!
//! Models run locally; no network is used at inference time. The model
//! files are fetched once during initialization, which is why this
//! backend is normally wrapped in a [`LazyEmbedder`](crate::LazyEmbedder)
//! and built only when a score is actually requested.

use std::sync::Arc;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use groundcheck_core::embedder::{EmbedError, Embedding, TextEmbedder};

use crate::factory::{EmbedderFactory, FactoryError};

/// Default model name, the small general-purpose sentence model.
pub const DEFAULT_MODEL_NAME: &str = "all-minilm-l6-v2";

/// Embedding backend over a local ONNX model.
///
/// The underlying session requires exclusive access per call, so the
/// model sits behind a mutex; batches serialize at the model, which is
/// also where the compute is.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl FastEmbedder {
    /// Backend with the default model.
    pub fn new() -> Result<Self, EmbedError> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2)
    }

    /// Backend with a specific model. Fails when the model cannot be
    /// fetched or the ONNX runtime cannot load it.
    pub fn with_model(model: EmbeddingModel) -> Result<Self, EmbedError> {
        let model_name = format!("{model:?}");
        let init_options = InitOptions::new(model).with_show_download_progress(true);
        let text_embedding = TextEmbedding::try_new(init_options).map_err(|e| {
            EmbedError::unavailable(format!("failed to initialize fastembed model: {e}"))
        })?;
        Ok(Self {
            model: Mutex::new(text_embedding),
            model_name,
        })
    }

    /// Model identifier, e.g. "AllMiniLML6V2".
    pub fn model(&self) -> &str {
        &self.model_name
    }
}

impl TextEmbedder for FastEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let text_refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let mut model = self.model.lock();
        let vectors = model
            .embed(text_refs, None)
            .map_err(|e| EmbedError::backend(format!("fastembed embedding failed: {e}")))?;
        debug!(batch = texts.len(), model = %self.model_name, "embedded batch");
        Ok(vectors)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Parse a model name to its fastembed model. Unknown names fall back to
/// the default rather than failing, with a warning.
fn parse_model(name: &str) -> EmbeddingModel {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" | "allminilml6v2" => EmbeddingModel::AllMiniLML6V2,
        "bge-small-en" | "bgesmallen" => EmbeddingModel::BGESmallENV15,
        "multilingual-e5-small" => EmbeddingModel::MultilingualE5Small,
        other => {
            warn!(
                model = other,
                "unknown embedding model name, using {}", DEFAULT_MODEL_NAME
            );
            EmbeddingModel::AllMiniLML6V2
        }
    }
}

/// Factory for the fastembed backend.
///
/// Config: `{"model": <name>}`, optional.
pub struct FastEmbedderFactory;

impl FastEmbedderFactory {
    fn model_name(config: &JsonValue) -> String {
        config
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_MODEL_NAME)
            .to_string()
    }
}

impl EmbedderFactory for FastEmbedderFactory {
    fn provider_kind(&self) -> &'static str {
        "fastembed"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextEmbedder>, FactoryError> {
        self.validate_config(config)?;
        let model = parse_model(&Self::model_name(config));
        let embedder =
            FastEmbedder::with_model(model).map_err(|e| FactoryError::InitFailed(e.to_string()))?;
        Ok(Arc::new(embedder))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), FactoryError> {
        match config.get("model") {
            None | Some(JsonValue::Null) | Some(JsonValue::String(_)) => Ok(()),
            Some(other) => Err(FactoryError::InvalidConfig(format!(
                "model must be a string, got {other}"
            ))),
        }
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "model": DEFAULT_MODEL_NAME })
    }

    fn description(&self) -> &'static str {
        "Local ONNX sentence embeddings via fastembed (fetches the model on first use)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Initializing a real model downloads files, so tests stop at name
    // parsing and config validation.

    #[test]
    fn test_parse_model_known_aliases() {
        assert!(matches!(
            parse_model("all-MiniLM-L6-v2"),
            EmbeddingModel::AllMiniLML6V2
        ));
        assert!(matches!(
            parse_model("bge-small-en"),
            EmbeddingModel::BGESmallENV15
        ));
        assert!(matches!(
            parse_model("multilingual-e5-small"),
            EmbeddingModel::MultilingualE5Small
        ));
    }

    #[test]
    fn test_unknown_model_name_falls_back_to_default() {
        assert!(matches!(
            parse_model("word2vec-classic"),
            EmbeddingModel::AllMiniLML6V2
        ));
    }

    #[test]
    fn test_factory_validates_model_field_type() {
        let factory = FastEmbedderFactory;
        assert!(factory.validate_config(&serde_json::json!({})).is_ok());
        assert!(factory
            .validate_config(&serde_json::json!({ "model": "bge-small-en" }))
            .is_ok());
        assert!(matches!(
            factory.validate_config(&serde_json::json!({ "model": 7 })),
            Err(FactoryError::InvalidConfig(_))
        ));
    }
}
