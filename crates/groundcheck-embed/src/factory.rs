//! Embedder factory pattern for creating backends by name.
//!
//! New backends register factories that build instances from JSON
//! configuration, so callers select a provider by kind string without
//! matching on an enum.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = EmbedderRegistry::new();
//! registry.register(Arc::new(HashEmbedderFactory));
//!
//! let embedder = registry.create("hash", &config)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use groundcheck_core::embedder::TextEmbedder;

use crate::hash::{HashEmbedder, DEFAULT_DIMENSIONS};

/// Errors from embedder construction and registry lookup.
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("unknown embedder kind: {0}")]
    UnknownKind(String),

    #[error("invalid embedder config: {0}")]
    InvalidConfig(String),

    #[error("embedder initialization failed: {0}")]
    InitFailed(String),
}

/// Factory for creating embedding backends from configuration.
pub trait EmbedderFactory: Send + Sync {
    /// Unique kind identifier, e.g. "hash" or "fastembed".
    fn provider_kind(&self) -> &'static str;

    /// Create an embedder instance from JSON configuration.
    fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextEmbedder>, FactoryError>;

    /// Validate configuration without creating an embedder.
    fn validate_config(&self, config: &JsonValue) -> Result<(), FactoryError>;

    /// Default configuration for this backend.
    fn default_config(&self) -> JsonValue {
        serde_json::json!({})
    }

    /// Human-readable description, shown by provider listings.
    fn description(&self) -> &'static str {
        "Embedding backend"
    }
}

/// Registry of available embedder factories, keyed by kind.
#[derive(Default)]
pub struct EmbedderRegistry {
    factories: BTreeMap<String, Arc<dyn EmbedderFactory>>,
}

impl EmbedderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in backends registered: `hash` always,
    /// `fastembed` when that feature is enabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HashEmbedderFactory));
        #[cfg(feature = "fastembed")]
        registry.register(Arc::new(crate::fastembed::FastEmbedderFactory));
        registry
    }

    /// Register a factory. A factory with the same kind is replaced.
    pub fn register(&mut self, factory: Arc<dyn EmbedderFactory>) {
        self.factories
            .insert(factory.provider_kind().to_string(), factory);
    }

    /// Create an embedder from kind name and configuration.
    pub fn create(
        &self,
        kind: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn TextEmbedder>, FactoryError> {
        self.factories
            .get(kind)
            .ok_or_else(|| {
                FactoryError::UnknownKind(format!(
                    "'{}'. Available: {:?}",
                    kind,
                    self.available_kinds()
                ))
            })?
            .create(config)
    }

    /// Validate configuration for a kind.
    pub fn validate(&self, kind: &str, config: &JsonValue) -> Result<(), FactoryError> {
        self.factories
            .get(kind)
            .ok_or_else(|| FactoryError::UnknownKind(format!("'{kind}'")))?
            .validate_config(config)
    }

    /// List registered kinds.
    pub fn available_kinds(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Whether a kind is registered.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Kind and description pairs for provider listings.
    pub fn descriptions(&self) -> Vec<(&str, &str)> {
        self.factories
            .values()
            .map(|f| (f.provider_kind(), f.description()))
            .collect()
    }
}

impl std::fmt::Debug for EmbedderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedderRegistry")
            .field("embedders", &self.available_kinds())
            .finish()
    }
}

/// Factory for the hashed bag-of-words embedder.
///
/// Config: `{"dimensions": <positive integer>}`, all fields optional.
pub struct HashEmbedderFactory;

impl HashEmbedderFactory {
    fn dimensions(config: &JsonValue) -> Result<usize, FactoryError> {
        match config.get("dimensions") {
            None | Some(JsonValue::Null) => Ok(DEFAULT_DIMENSIONS),
            Some(value) => match value.as_u64() {
                Some(n) if n > 0 => Ok(n as usize),
                _ => Err(FactoryError::InvalidConfig(format!(
                    "dimensions must be a positive integer, got {value}"
                ))),
            },
        }
    }
}

impl EmbedderFactory for HashEmbedderFactory {
    fn provider_kind(&self) -> &'static str {
        "hash"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextEmbedder>, FactoryError> {
        let dimensions = Self::dimensions(config)?;
        Ok(Arc::new(HashEmbedder::new(dimensions)))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), FactoryError> {
        Self::dimensions(config).map(|_| ())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "dimensions": DEFAULT_DIMENSIONS })
    }

    fn description(&self) -> &'static str {
        "Deterministic hashed bag-of-words embedder for tests and smoke runs (not a semantic model)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = EmbedderRegistry::new();
        registry.register(Arc::new(HashEmbedderFactory));

        assert!(registry.has_kind("hash"));
        assert!(!registry.has_kind("unknown"));

        let embedder = registry.create("hash", &serde_json::json!({})).unwrap();
        assert_eq!(embedder.name(), "hash");
    }

    #[test]
    fn test_registry_unknown_kind_lists_available() {
        let registry = EmbedderRegistry::with_defaults();
        let result = registry.create("sentencepiece", &serde_json::json!({}));
        assert!(result.is_err());

        match result {
            Err(FactoryError::UnknownKind(msg)) => {
                assert!(msg.contains("sentencepiece"));
                assert!(msg.contains("hash"));
            }
            _ => panic!("expected UnknownKind error"),
        }
    }

    #[test]
    fn test_with_defaults_always_has_hash() {
        let registry = EmbedderRegistry::with_defaults();
        assert!(registry.has_kind("hash"));
    }

    #[test]
    fn test_hash_factory_honors_dimensions() {
        let embedder = HashEmbedderFactory
            .create(&serde_json::json!({ "dimensions": 16 }))
            .unwrap();
        assert_eq!(embedder.embed("token").unwrap().len(), 16);
    }

    #[test]
    fn test_hash_factory_rejects_bad_dimensions() {
        let config = serde_json::json!({ "dimensions": 0 });
        assert!(matches!(
            HashEmbedderFactory.validate_config(&config),
            Err(FactoryError::InvalidConfig(_))
        ));

        let config = serde_json::json!({ "dimensions": "many" });
        assert!(matches!(
            HashEmbedderFactory.validate_config(&config),
            Err(FactoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_descriptions_and_default_config() {
        let registry = EmbedderRegistry::with_defaults();
        assert!(registry
            .descriptions()
            .iter()
            .any(|(kind, text)| *kind == "hash" && text.contains("bag-of-words")));

        let defaults = HashEmbedderFactory.default_config();
        assert_eq!(defaults["dimensions"], serde_json::json!(DEFAULT_DIMENSIONS));
    }

    #[test]
    fn test_registry_validate() {
        let registry = EmbedderRegistry::with_defaults();
        assert!(registry.validate("hash", &serde_json::json!({})).is_ok());
        assert!(registry
            .validate("unknown", &serde_json::json!({}))
            .is_err());
    }
}
