//! Sequential incremental text-clustering engine for incident analytics.
//!
//! Given a growing, unordered stream of short free-text records (incident
//! descriptions, or work-note steps extracted from incident logs), assign
//! each new record to an existing semantic cluster or create a new one —
//! no pre-training, no fixed cluster count, no offline batch pass.
//!
//! Processing within one clustering universe is strictly sequential: the
//! label for item *i* may depend only on the labels already committed for
//! items `0..i-1`. Independent owner keys share no state and may be
//! processed concurrently.

pub mod assigner;
pub mod cache;
pub mod canonical;
pub mod pipeline;
pub mod similarity;
pub mod worklog;

pub use assigner::{extract_error_code, AssignerConfig, ClusterAssigner};
pub use cache::EmbeddingCache;
pub use canonical::canonicalize_batch;
pub use pipeline::{label_incidents, mine_steps, IncidentRecord, MinedStep};
pub use similarity::{cosine_similarity, majority_vote, similarity_metric};
pub use worklog::{classify_note_type, segment_worknotes};
