//! Lazily initialized, process-lifetime embedder handle.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::info;

use groundcheck_core::embedder::{EmbedError, Embedding, TextEmbedder};

use crate::factory::EmbedderRegistry;

type InitFn = dyn Fn() -> Result<Arc<dyn TextEmbedder>, EmbedError> + Send + Sync;

/// Defers backend construction to the first embedding call.
///
/// Building a `LazyEmbedder` never fails and performs no backend work, so
/// code paths that never request a score never observe provider
/// availability. The first call initializes the backend under a mutex
/// (concurrent first calls cannot race a duplicate initialization) and
/// memoizes it for the process lifetime; a failed initialization leaves
/// the slot empty, and the next call retries.
pub struct LazyEmbedder {
    label: String,
    init: Box<InitFn>,
    inner: Mutex<Option<Arc<dyn TextEmbedder>>>,
}

impl LazyEmbedder {
    pub fn new<F>(label: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextEmbedder>, EmbedError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            init: Box::new(init),
            inner: Mutex::new(None),
        }
    }

    /// Handle whose backend is resolved through `registry` by kind on
    /// first use. Registry misses surface as provider-unavailable errors
    /// at that point, not here.
    pub fn from_registry(registry: EmbedderRegistry, kind: &str, config: serde_json::Value) -> Self {
        let label = kind.to_string();
        let kind = kind.to_string();
        Self::new(label, move || {
            registry
                .create(&kind, &config)
                .map_err(|err| EmbedError::unavailable(err.to_string()))
        })
    }

    /// Whether the backend has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }

    fn handle(&self) -> Result<Arc<dyn TextEmbedder>, EmbedError> {
        let mut guard = self.inner.lock();
        if let Some(embedder) = guard.as_ref() {
            return Ok(Arc::clone(embedder));
        }

        let started = Instant::now();
        let embedder = (self.init)()?;
        info!(
            backend = embedder.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "initialized embedding backend"
        );
        *guard = Some(Arc::clone(&embedder));
        Ok(embedder)
    }
}

impl TextEmbedder for LazyEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        // Lock released before the embedding call; only first-use
        // initialization serializes.
        let embedder = self.handle()?;
        embedder.embed_batch(texts)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for LazyEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("label", &self.label)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ConstEmbedder;

    impl TextEmbedder for ConstEmbedder {
        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn name(&self) -> &str {
            "const"
        }
    }

    #[test]
    fn test_construction_does_no_backend_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = calls.clone();
        let lazy = LazyEmbedder::new("test", move || {
            counting.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ConstEmbedder) as Arc<dyn TextEmbedder>)
        });

        assert!(!lazy.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(lazy.name(), "test");
    }

    #[test]
    fn test_initializes_once_and_memoizes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = calls.clone();
        let lazy = LazyEmbedder::new("test", move || {
            counting.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ConstEmbedder) as Arc<dyn TextEmbedder>)
        });

        lazy.embed("a").unwrap();
        lazy.embed("b").unwrap();
        assert!(lazy.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_initialization_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = calls.clone();
        let lazy = LazyEmbedder::new("flaky", move || {
            if counting.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(EmbedError::unavailable("backend warming up"))
            } else {
                Ok(Arc::new(ConstEmbedder) as Arc<dyn TextEmbedder>)
            }
        });

        assert!(matches!(
            lazy.embed("a"),
            Err(EmbedError::ProviderUnavailable { .. })
        ));
        assert!(!lazy.is_initialized());

        lazy.embed("a").unwrap();
        lazy.embed("a").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_registry_resolves_by_kind() {
        let lazy = LazyEmbedder::from_registry(
            EmbedderRegistry::with_defaults(),
            "hash",
            serde_json::json!({ "dimensions": 32 }),
        );
        assert_eq!(lazy.embed("paris").unwrap().len(), 32);
    }

    #[test]
    fn test_from_registry_unknown_kind_fails_lazily() {
        let lazy = LazyEmbedder::from_registry(
            EmbedderRegistry::with_defaults(),
            "nonexistent",
            serde_json::json!({}),
        );
        // Construction succeeded; only scoring observes the miss.
        let err = lazy.embed("text").unwrap_err();
        assert!(matches!(err, EmbedError::ProviderUnavailable { .. }));
        assert!(err.to_string().contains("unknown embedder kind"));
    }
}
