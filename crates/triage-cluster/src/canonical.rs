//! Representative selection for labeled batches.
//!
//! After assignment every cluster holds several noisy variants of the same
//! underlying text. For display and downstream process mining each cluster
//! collapses to one canonical representative: the shortest cleaned text in
//! the cluster, on the heuristic that the shortest member carries the least
//! noise.

use std::collections::HashMap;

use tracing::debug;

use triage_core::LabeledItem;

/// Rewrite every item's display text to its cluster's representative.
///
/// The representative for a label is the first item for that label in a
/// stable ascending sort by cleaned-text length, hence the shortest member
/// (earliest committed among equal lengths). Labels are untouched, and the
/// pass is idempotent: a second run finds every cluster already uniform.
pub fn canonicalize_batch(batch: Vec<LabeledItem>) -> Vec<LabeledItem> {
    let mut by_length: Vec<&LabeledItem> = batch.iter().collect();
    by_length.sort_by_key(|e| e.item.clean_text.chars().count());

    let mut representatives: HashMap<&str, &str> = HashMap::new();
    for entry in by_length {
        representatives
            .entry(entry.label.as_str())
            .or_insert(entry.item.clean_text.as_str());
    }

    debug!(
        subsystem = "cluster",
        component = "canonical",
        op = "canonicalize",
        entry_count = batch.len(),
        cluster = representatives.len(),
        "Canonicalizing batch"
    );

    let rewritten: Vec<String> = batch
        .iter()
        .map(|e| representatives[e.label.as_str()].to_string())
        .collect();

    batch
        .into_iter()
        .zip(rewritten)
        .map(|(mut entry, text)| {
            entry.item.raw_text = text.clone();
            entry.item.clean_text = text;
            entry
        })
        .collect()
}
