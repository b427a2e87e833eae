//! Embedding backend implementations for the triage clustering engine.
//!
//! The clustering crates depend only on `triage_core::EmbeddingBackend`;
//! this crate supplies the concrete providers: a local Ollama HTTP backend
//! (default feature `ollama`) and a deterministic mock backend for tests
//! (feature `mock`).

#[cfg(feature = "mock")]
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "mock")]
pub use mock::{MockEmbeddingBackend, MockEmbeddingGenerator};
#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;
