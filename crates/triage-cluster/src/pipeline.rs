//! Batch drivers tying segmentation, assignment, and canonicalization
//! together.
//!
//! Ordering discipline: within one owner key (or one incident's steps)
//! labeling is strictly sequential, each item seeing exactly the entries
//! committed before it. Independent owner keys share no state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use triage_core::{Item, LabeledLog, WorkLogEntry};

use crate::assigner::ClusterAssigner;
use crate::canonical::canonicalize_batch;
use crate::worklog::{classify_note_type, segment_worknotes};

/// One incident as it arrives from the source system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: String,
    pub short_description: String,
    /// Impacted application; partitions the clustering universes.
    pub owner_key: String,
    /// Raw concatenated work-note blob.
    pub work_notes: String,
}

/// One work-note step with its process label, after canonicalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinedStep {
    pub entry: WorkLogEntry,
    pub label: triage_core::ClusterLabel,
    /// Standard work-note kind, or "unformatted".
    pub kind: String,
}

/// Label every incident description, one independent log per owner key.
///
/// Records are consumed in input order; within each owner key that order is
/// the log's commit order.
pub async fn label_incidents(
    records: &[IncidentRecord],
    assigner: &ClusterAssigner,
) -> HashMap<String, LabeledLog> {
    let mut logs: HashMap<String, LabeledLog> = HashMap::new();

    for record in records {
        let item = Item::new(&record.id, &record.short_description, &record.owner_key);
        let log = logs
            .entry(record.owner_key.clone())
            .or_insert_with(|| LabeledLog::for_owner(&record.owner_key));
        let label = assigner.assign_incident_subclass(&item, log).await;
        log.push(item, label);
    }

    info!(
        subsystem = "cluster",
        component = "pipeline",
        op = "label_incidents",
        input_count = records.len(),
        owner_key = logs.len(),
        "Incident labeling complete"
    );
    logs
}

/// Segment one incident's work notes, label the steps sequentially, and
/// canonicalize each cluster to its representative note.
pub async fn mine_steps(
    incident_id: &str,
    blob: &str,
    assigner: &ClusterAssigner,
) -> Vec<MinedStep> {
    let entries = segment_worknotes(incident_id, blob);

    let mut log = LabeledLog::unscoped();
    for (index, entry) in entries.iter().enumerate() {
        // Notes are already display-cleaned by the segmenter; build the item
        // directly rather than cleaning twice.
        let item = Item {
            id: format!("{}:{}", incident_id, index),
            raw_text: entry.note.clone(),
            clean_text: entry.note.clone(),
            owner_key: String::new(),
        };
        let label = assigner.assign_step_subclass(&item, &log).await;
        log.push(item, label);
    }

    let canonical = canonicalize_batch(log.into_entries());

    let steps: Vec<MinedStep> = canonical
        .into_iter()
        .zip(entries)
        .map(|(labeled, entry)| {
            let note = labeled.item.clean_text;
            let kind = classify_note_type(&note).to_string();
            MinedStep {
                entry: WorkLogEntry {
                    incident_id: entry.incident_id,
                    timestamp: entry.timestamp,
                    note,
                },
                label: labeled.label,
                kind,
            }
        })
        .collect();

    info!(
        subsystem = "cluster",
        component = "pipeline",
        op = "mine_steps",
        incident_id,
        entry_count = steps.len(),
        "Step mining complete"
    );
    steps
}
