//! Data model for incremental incident clustering.
//!
//! The central structure is the [`LabeledLog`]: an append-only, ordered
//! sequence of labeled items for one clustering universe (one owner key, or
//! one incident's work-note steps). Label assignment for item *i* may consult
//! only the entries already committed for items `0..i-1`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalize::clean_display_text;

/// Embedding vector type shared across the workspace.
pub type Vector = Vec<f32>;

/// One unit of text to be clustered: a whole incident description or a single
/// extracted work-note step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Source identifier (incident number, or incident number + entry index).
    pub id: String,
    /// Text as it arrived from the source system.
    pub raw_text: String,
    /// Display-normalized text (see [`clean_display_text`]).
    pub clean_text: String,
    /// Partition key defining an independent clustering universe.
    /// Empty for unscoped (step) clustering.
    pub owner_key: String,
}

impl Item {
    /// Create an item, deriving `clean_text` from the raw text.
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        owner_key: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        let clean_text = clean_display_text(&raw_text);
        Self {
            id: id.into(),
            raw_text,
            clean_text,
            owner_key: owner_key.into(),
        }
    }
}

/// An assigned cluster name.
///
/// Labels are opaque strings of the form `<owner>_SubClass_<n>` (incident
/// clustering) or `SubClass_<n>` (step clustering). There is no "not found"
/// label; absence is expressed by [`MatchOutcome::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabel(String);

impl ClusterLabel {
    /// The n-th cluster for an owner key: `<owner>_SubClass_<n>`.
    pub fn numbered(owner_key: &str, n: usize) -> Self {
        Self(format!("{}_SubClass_{}", owner_key, n))
    }

    /// The n-th unscoped cluster: `SubClass_<n>`.
    pub fn unscoped(n: usize) -> Self {
        Self(format!("SubClass_{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClusterLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Result of a matching stage inside the assigner.
///
/// Replaces the stringly `NO_MATCH` sentinel of older designs: "no match"
/// cannot be confused with a real cluster name, and `NotFound` is never
/// stored in a [`LabeledLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A prior cluster matched.
    Found(ClusterLabel),
    /// No stage produced a match; the caller mints a new cluster.
    NotFound,
}

impl MatchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchOutcome::Found(_))
    }

    pub fn into_option(self) -> Option<ClusterLabel> {
        match self {
            MatchOutcome::Found(label) => Some(label),
            MatchOutcome::NotFound => None,
        }
    }
}

/// An item together with its committed cluster label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledItem {
    pub item: Item,
    pub label: ClusterLabel,
}

/// Append-only ordered sequence of labeled items for one clustering universe.
///
/// Entries are committed in processing order and never mutated afterwards;
/// the canonicalizer produces a rewritten copy rather than editing a log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabeledLog {
    owner_key: Option<String>,
    entries: Vec<LabeledItem>,
}

impl LabeledLog {
    /// A log scoped to one owner key (incident clustering).
    pub fn for_owner(owner_key: impl Into<String>) -> Self {
        Self {
            owner_key: Some(owner_key.into()),
            entries: Vec::new(),
        }
    }

    /// An unscoped log (step clustering within one incident).
    pub fn unscoped() -> Self {
        Self {
            owner_key: None,
            entries: Vec::new(),
        }
    }

    pub fn owner_key(&self) -> Option<&str> {
        self.owner_key.as_deref()
    }

    /// Commit a labeled item. Appends only; existing entries are untouched.
    pub fn push(&mut self, item: Item, label: ClusterLabel) {
        self.entries.push(LabeledItem { item, label });
    }

    pub fn entries(&self) -> &[LabeledItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct labels committed so far. New clusters are numbered
    /// `distinct_label_count() + 1` at creation time.
    pub fn distinct_label_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.label.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Consume the log, yielding its entries in commit order.
    pub fn into_entries(self) -> Vec<LabeledItem> {
        self.entries
    }
}

/// One timestamped work-note extracted from an incident's raw log blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub incident_id: String,
    pub timestamp: String,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_label_format() {
        let label = ClusterLabel::numbered("CRM", 1);
        assert_eq!(label.as_str(), "CRM_SubClass_1");
        assert_eq!(label.to_string(), "CRM_SubClass_1");
    }

    #[test]
    fn test_unscoped_label_format() {
        assert_eq!(ClusterLabel::unscoped(4).as_str(), "SubClass_4");
    }

    #[test]
    fn test_label_serde_transparent() {
        let label = ClusterLabel::numbered("Billing", 2);
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"Billing_SubClass_2\"");
        let back: ClusterLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);
    }

    #[test]
    fn test_match_outcome_into_option() {
        let found = MatchOutcome::Found(ClusterLabel::unscoped(1));
        assert!(found.is_found());
        assert_eq!(
            found.into_option(),
            Some(ClusterLabel::from("SubClass_1"))
        );
        assert_eq!(MatchOutcome::NotFound.into_option(), None);
    }

    #[test]
    fn test_item_derives_clean_text() {
        let item = Item::new("INC001", "Login&gtFAILED", "CRM");
        assert_eq!(item.raw_text, "Login&gtFAILED");
        assert_eq!(item.clean_text, clean_display_text("Login&gtFAILED"));
    }

    #[test]
    fn test_log_append_preserves_order() {
        let mut log = LabeledLog::for_owner("CRM");
        log.push(Item::new("a", "first", "CRM"), ClusterLabel::numbered("CRM", 1));
        log.push(Item::new("b", "second", "CRM"), ClusterLabel::numbered("CRM", 1));
        log.push(Item::new("c", "third", "CRM"), ClusterLabel::numbered("CRM", 2));

        let ids: Vec<_> = log.entries().iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.owner_key(), Some("CRM"));
    }

    #[test]
    fn test_distinct_label_count() {
        let mut log = LabeledLog::unscoped();
        assert_eq!(log.distinct_label_count(), 0);

        log.push(Item::new("a", "x", ""), ClusterLabel::unscoped(1));
        log.push(Item::new("b", "y", ""), ClusterLabel::unscoped(1));
        log.push(Item::new("c", "z", ""), ClusterLabel::unscoped(2));
        assert_eq!(log.distinct_label_count(), 2);
    }

    #[test]
    fn test_empty_log() {
        let log = LabeledLog::unscoped();
        assert!(log.is_empty());
        assert_eq!(log.owner_key(), None);
    }
}
