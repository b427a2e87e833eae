//! Core traits for triage abstractions.
//!
//! The clustering engine treats embedding generation as an opaque external
//! capability behind [`EmbeddingBackend`], enabling pluggable providers and
//! deterministic tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Vector;

/// Backend for generating text embeddings.
///
/// Implementations must be deterministic for identical input within one
/// batch; determinism across process runs is not required.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns a vector of embedding vectors, one per input text.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend;

    #[async_trait]
    impl EmbeddingBackend for FixedBackend {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_backend_object_safety() {
        let backend: Box<dyn EmbeddingBackend> = Box::new(FixedBackend);
        let out = backend
            .embed_texts(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(backend.dimension(), 2);
        assert_eq!(backend.model_name(), "fixed");
    }
}
