//! Work-note segmentation and classification.
//!
//! Incident systems export work notes as one concatenated blob per incident,
//! with each entry announced by a `D-DD`-shaped timestamp. Segmentation is a
//! regex heuristic by design; it lives behind this module so a stricter
//! parser could replace it without touching the clustering logic.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use triage_core::{clean_display_text, WorkLogEntry};

/// Entry boundary: a whitespace run immediately preceding the next
/// timestamp marker. The marker itself belongs to the following entry.
static ENTRY_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\d+-\d{2}").expect("Invalid boundary regex"));

/// First line of a chunk: everything before the final `-DD` marker is the
/// timestamp, everything after it starts the note.
static FIRST_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)-(\d{2})\s*(.*)$").expect("Invalid first-line regex"));

/// Split one incident's raw work-note blob into timestamped entries.
///
/// Chunks that do not carry the expected timestamp shape are skipped; a
/// zero-length result means "no extractable structure", not an error.
pub fn segment_worknotes(incident_id: &str, blob: &str) -> Vec<WorkLogEntry> {
    let mut entries = Vec::new();

    for chunk in split_on_boundaries(blob) {
        let mut lines = chunk.lines();
        let first = match lines.next() {
            Some(line) => line,
            None => continue,
        };

        let captures = match FIRST_LINE.captures(first) {
            Some(c) => c,
            None => {
                debug!(
                    subsystem = "cluster",
                    component = "segmenter",
                    incident_id,
                    "Chunk without timestamp shape, skipping"
                );
                continue;
            }
        };

        let timestamp = captures[1].to_string();
        let mut note_parts: Vec<&str> = vec![captures.get(3).map_or("", |m| m.as_str())];
        note_parts.extend(lines);
        let note = clean_display_text(&note_parts.join(" "));

        entries.push(WorkLogEntry {
            incident_id: incident_id.to_string(),
            timestamp,
            note,
        });
    }

    debug!(
        subsystem = "cluster",
        component = "segmenter",
        op = "segment",
        incident_id,
        entry_count = entries.len(),
        "Segmentation complete"
    );
    entries
}

/// Cut the blob before each timestamp marker, dropping the whitespace run
/// that precedes it.
fn split_on_boundaries(blob: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;

    for boundary in ENTRY_BOUNDARY.find_iter(blob) {
        if boundary.start() > start {
            chunks.push(&blob[start..boundary.start()]);
        }
        let matched = boundary.as_str();
        let ws_len = matched.len() - matched.trim_start().len();
        start = boundary.start() + ws_len;
    }
    if start < blob.len() {
        chunks.push(&blob[start..]);
    }

    chunks
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Standard work-note kinds recognized by their opening words.
const NOTE_TYPES: &[&str] = &[
    "assignment",
    "automatic assignment",
    "remarks",
    "request info",
    "ask if",
    "response was",
    "take action",
    "action outcome",
    "escalate to",
    "user reported",
    "raise",
    "resolved",
    "resolution note",
];

/// Classify a cleaned work note by its opening words; notes that start with
/// none of the standard kinds are "unformatted".
pub fn classify_note_type(note: &str) -> &'static str {
    let lowered = note.to_lowercase();
    NOTE_TYPES
        .iter()
        .find(|t| lowered.starts_with(**t))
        .copied()
        .unwrap_or("unformatted")
}
