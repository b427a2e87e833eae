//! Batch-scoped embedding memoization.
//!
//! Embedding computation dominates the cost of a clustering batch: a naive
//! implementation re-embeds every prior log entry for every new item. The
//! cache guarantees at most one backend call per distinct preprocessed text
//! per batch. Failures are not cached, so a transient backend outage does
//! not poison later retries of the same text.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use triage_core::{EmbeddingBackend, Error, Result, Vector};

/// Memoizing wrapper around an [`EmbeddingBackend`], valid for one batch.
pub struct EmbeddingCache {
    backend: Arc<dyn EmbeddingBackend>,
    cache: Mutex<HashMap<String, Vector>>,
}

impl EmbeddingCache {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Embed one text, reusing the cached vector when the same text has
    /// already been embedded in this batch.
    pub async fn embed(&self, text: &str) -> Result<Vector> {
        if let Some(vector) = self.cache.lock().expect("cache lock").get(text).cloned() {
            trace!(subsystem = "cluster", component = "cache", "Cache hit");
            return Ok(vector);
        }

        let vectors = self.backend.embed_texts(&[text.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Backend returned no vector".to_string()))?;

        self.cache
            .lock()
            .expect("cache lock")
            .insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    /// Number of distinct texts embedded so far.
    pub fn len(&self) -> usize {
        self.cache.lock().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &Arc<dyn EmbeddingBackend> {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_inference::MockEmbeddingBackend;

    #[tokio::test]
    async fn test_repeat_embeds_hit_cache() {
        let mock = MockEmbeddingBackend::new().with_dimension(8);
        let cache = EmbeddingCache::new(Arc::new(mock.clone()));

        let a1 = cache.embed("disk full").await.unwrap();
        let a2 = cache.embed("disk full").await.unwrap();
        let b = cache.embed("vpn down").await.unwrap();

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(mock.embed_call_count(), 2, "one backend call per distinct text");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mock = MockEmbeddingBackend::new().with_failing_text("poison");
        let cache = EmbeddingCache::new(Arc::new(mock.clone()));

        assert!(cache.embed("poison").await.is_err());
        assert!(cache.embed("poison").await.is_err());
        assert_eq!(cache.len(), 0);
        assert_eq!(mock.embed_call_count(), 2, "failed text is retried, not cached");
    }
}
