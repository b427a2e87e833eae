//! Default constants shared across the triage workspace.

/// Default Ollama endpoint for the embedding backend.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default embedding model.
pub const EMBED_MODEL: &str = "nomic-embed-text";

/// Default embedding dimension for nomic-embed-text.
pub const EMBED_DIMENSION: usize = 768;

/// Timeout for embedding requests (seconds).
pub const EMBED_TIMEOUT_SECS: u64 = 60;

/// Minimum similarity a prior entry must exceed (strictly) to be a
/// clustering candidate.
pub const SIMILARITY_THRESHOLD: f32 = 0.65;

/// Number of nearest neighbors consulted in the majority vote.
pub const KNN_K: usize = 3;
