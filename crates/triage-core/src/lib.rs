//! Core types, traits, and text normalization for the triage clustering engine.
//!
//! This crate holds everything the other `triage-*` crates share: the error
//! taxonomy, the data model for labeled incident logs, the embedding backend
//! trait, structured logging field names, and the two text-normalization
//! paths (display cleaning and embedding preprocessing).

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod preprocess;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    ClusterLabel, Item, LabeledItem, LabeledLog, MatchOutcome, Vector, WorkLogEntry,
};
pub use normalize::clean_display_text;
pub use preprocess::{preprocess_for_embedding, PreprocessConfig};
pub use traits::EmbeddingBackend;
