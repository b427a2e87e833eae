//! Structured logging schema and field name constants for triage.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, batch completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration, similarity scores |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "cluster", "inference", "core"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "assigner", "segmenter", "ollama", "cache"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "assign_incident", "assign_step", "embed_texts", "segment"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Partition key of the clustering universe being operated on.
pub const OWNER_KEY: &str = "owner_key";

/// Incident identifier from the source system.
pub const INCIDENT_ID: &str = "incident_id";

/// Cluster label assigned or matched.
pub const CLUSTER: &str = "cluster";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Similarity score of the best candidate.
pub const SIMILARITY: &str = "similarity";

/// Number of prior entries that survived the threshold filter.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Number of input texts sent to an embedding model.
pub const INPUT_COUNT: &str = "input_count";

/// Number of work-note entries produced by segmentation.
pub const ENTRY_COUNT: &str = "entry_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for embedding.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
