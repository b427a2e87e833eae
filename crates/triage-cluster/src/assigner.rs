//! Sequential cluster assignment.
//!
//! One algorithm shape, two instantiations: incident descriptions (owner-key
//! scoped labels, with an exact error-code shortcut) and work-note steps
//! (unscoped labels, similarity only). Both consult nothing but the
//! already-committed entries of one [`LabeledLog`], so label assignment for
//! item *i* depends only on items `0..i-1`.
//!
//! Backend failures never escape this module: a query that cannot be embedded
//! falls back to minting a new cluster, and a log candidate that cannot be
//! embedded scores 0.0 and drops out of the vote.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use triage_core::defaults;
use triage_core::{
    ClusterLabel, EmbeddingBackend, Item, LabeledLog, MatchOutcome, PreprocessConfig,
};

use crate::cache::EmbeddingCache;
use crate::similarity::{majority_vote, similarity_metric};

/// Explicit error-code token: the literal word "error" followed by a number.
/// Case-sensitive; source systems emit these lowercase.
static ERROR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"error *\d+").expect("Invalid error-code regex"));

/// First explicit error-code token in `text`, if any.
pub fn extract_error_code(text: &str) -> Option<&str> {
    ERROR_CODE.find(text).map(|m| m.as_str())
}

/// Tuning knobs for the assignment algorithm.
#[derive(Debug, Clone)]
pub struct AssignerConfig {
    /// Candidates must score strictly above this to enter the vote.
    pub similarity_threshold: f32,
    /// Number of nearest neighbors taking part in the majority vote.
    pub knn_k: usize,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::SIMILARITY_THRESHOLD,
            knn_k: defaults::KNN_K,
        }
    }
}

/// Assigns cluster labels to items one at a time.
///
/// Holds the batch-scoped embedding cache and the preprocessing
/// configuration; construct one per batch and drive it strictly in item
/// order.
pub struct ClusterAssigner {
    cache: EmbeddingCache,
    preprocess: PreprocessConfig,
    config: AssignerConfig,
}

impl ClusterAssigner {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self::with_config(backend, AssignerConfig::default())
    }

    pub fn with_config(backend: Arc<dyn EmbeddingBackend>, config: AssignerConfig) -> Self {
        Self {
            cache: EmbeddingCache::new(backend),
            preprocess: PreprocessConfig::default(),
            config,
        }
    }

    /// The batch-scoped embedding cache.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Label one incident description against the prior entries of its
    /// owner's log.
    ///
    /// Stages, in order: cold start, exact error-code match (authoritative,
    /// short-circuits similarity), thresholded top-K similarity vote, new
    /// cluster.
    pub async fn assign_incident_subclass(&self, item: &Item, log: &LabeledLog) -> ClusterLabel {
        let owner = item.owner_key.as_str();

        if log.is_empty() {
            let label = ClusterLabel::numbered(owner, 1);
            debug!(
                subsystem = "cluster",
                component = "assigner",
                op = "assign_incident",
                owner_key = owner,
                cluster = %label,
                "Cold start"
            );
            return label;
        }

        if let Some(code) = extract_error_code(&item.raw_text) {
            if let Some(entry) = log
                .entries()
                .iter()
                .find(|e| e.item.raw_text.contains(code))
            {
                debug!(
                    subsystem = "cluster",
                    component = "assigner",
                    op = "assign_incident",
                    owner_key = owner,
                    cluster = %entry.label,
                    "Exact error-code match"
                );
                return entry.label.clone();
            }
        }

        match self.match_by_similarity(&item.clean_text, log).await {
            MatchOutcome::Found(label) => label,
            MatchOutcome::NotFound => {
                let label = ClusterLabel::numbered(owner, log.distinct_label_count() + 1);
                debug!(
                    subsystem = "cluster",
                    component = "assigner",
                    op = "assign_incident",
                    owner_key = owner,
                    cluster = %label,
                    "New cluster"
                );
                label
            }
        }
    }

    /// Label one work-note step against the prior steps of its incident.
    ///
    /// Same shape as incident assignment minus the exact-match shortcut;
    /// labels are unscoped.
    pub async fn assign_step_subclass(&self, item: &Item, log: &LabeledLog) -> ClusterLabel {
        if log.is_empty() {
            return ClusterLabel::unscoped(1);
        }

        match self.match_by_similarity(&item.clean_text, log).await {
            MatchOutcome::Found(label) => label,
            MatchOutcome::NotFound => {
                let label = ClusterLabel::unscoped(log.distinct_label_count() + 1);
                debug!(
                    subsystem = "cluster",
                    component = "assigner",
                    op = "assign_step",
                    cluster = %label,
                    "New cluster"
                );
                label
            }
        }
    }

    /// Score `text` against every log entry and vote.
    ///
    /// `NotFound` means the caller should mint a new cluster: either no
    /// candidate survived the threshold, or the query itself could not be
    /// embedded.
    async fn match_by_similarity(&self, text: &str, log: &LabeledLog) -> MatchOutcome {
        let query_key = self.preprocess.preprocess_for_embedding(text);
        let query = match self.cache.embed(&query_key).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(
                    subsystem = "cluster",
                    component = "assigner",
                    error = %e,
                    "Query embedding failed, falling back to new cluster"
                );
                return MatchOutcome::NotFound;
            }
        };

        let mut scored = Vec::with_capacity(log.len());
        for entry in log.entries() {
            let candidate_key = self.preprocess.preprocess_for_embedding(&entry.item.clean_text);
            let score = match self.cache.embed(&candidate_key).await {
                Ok(candidate) => similarity_metric(&query, &candidate),
                Err(e) => {
                    warn!(
                        subsystem = "cluster",
                        component = "assigner",
                        error = %e,
                        "Candidate embedding failed, scoring 0.0"
                    );
                    0.0
                }
            };
            scored.push((score, entry.label.clone()));
        }

        let survivors = scored
            .iter()
            .filter(|(s, _)| *s > self.config.similarity_threshold)
            .count();
        debug!(
            subsystem = "cluster",
            component = "assigner",
            op = "similarity_vote",
            candidate_count = survivors,
            "Similarity scan complete"
        );

        majority_vote(scored, self.config.similarity_threshold, self.config.knn_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_inference::MockEmbeddingBackend;

    // Embedding keys are the preprocessed form of the display-cleaned text,
    // so pinned vectors must be registered under that form.
    fn key(raw: &str) -> String {
        let config = PreprocessConfig::default();
        config.preprocess_for_embedding(&triage_core::clean_display_text(raw))
    }

    fn assigner(mock: &MockEmbeddingBackend) -> ClusterAssigner {
        ClusterAssigner::new(Arc::new(mock.clone()))
    }

    #[test]
    fn test_extract_error_code() {
        assert_eq!(extract_error_code("login gave error 404 today"), Some("error 404"));
        assert_eq!(extract_error_code("error500"), Some("error500"));
        assert_eq!(extract_error_code("Error 404"), None);
        assert_eq!(extract_error_code("no codes here"), None);
    }

    #[tokio::test]
    async fn test_cold_start_mints_first_cluster() {
        let mock = MockEmbeddingBackend::new();
        let assigner = assigner(&mock);

        let item = Item::new("INC1", "cannot open crm dashboard", "CRM");
        let label = assigner
            .assign_incident_subclass(&item, &LabeledLog::for_owner("CRM"))
            .await;

        assert_eq!(label.as_str(), "CRM_SubClass_1");
        assert_eq!(mock.embed_call_count(), 0, "cold start needs no embedding");
    }

    #[tokio::test]
    async fn test_exact_code_beats_similarity() {
        // "payment page shows error 404" sits in cluster 2; the query shares
        // its error code, so it must land there without any embedding work
        // even though no vectors are pinned at all.
        let mock = MockEmbeddingBackend::new();
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("CRM");
        log.push(
            Item::new("INC1", "crm search slow", "CRM"),
            ClusterLabel::numbered("CRM", 1),
        );
        log.push(
            Item::new("INC2", "payment page shows error 404", "CRM"),
            ClusterLabel::numbered("CRM", 2),
        );

        let query = Item::new("INC3", "checkout fails with error 404", "CRM");
        let label = assigner.assign_incident_subclass(&query, &log).await;

        assert_eq!(label.as_str(), "CRM_SubClass_2");
        assert_eq!(mock.embed_call_count(), 0, "exact match short-circuits");
    }

    #[tokio::test]
    async fn test_similar_item_joins_existing_cluster() {
        // cos([1, 0], [0.9, sqrt(0.19)]) = 0.9 > 0.65.
        let mock = MockEmbeddingBackend::new()
            .with_vector(key("app login fails"), vec![1.0, 0.0])
            .with_vector(key("app login failure"), vec![0.9, 0.19f32.sqrt()]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("CRM");
        log.push(
            Item::new("INC1", "app login fails", "CRM"),
            ClusterLabel::numbered("CRM", 1),
        );

        let query = Item::new("INC2", "app login failure", "CRM");
        let label = assigner.assign_incident_subclass(&query, &log).await;

        assert_eq!(label.as_str(), "CRM_SubClass_1");
    }

    #[tokio::test]
    async fn test_dissimilar_item_mints_second_cluster() {
        // cos([1, 0], [0.2, sqrt(0.96)]) = 0.2 < 0.65.
        let mock = MockEmbeddingBackend::new()
            .with_vector(key("app login fails"), vec![1.0, 0.0])
            .with_vector(key("printer out of toner"), vec![0.2, 0.96f32.sqrt()]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("CRM");
        log.push(
            Item::new("INC1", "app login fails", "CRM"),
            ClusterLabel::numbered("CRM", 1),
        );

        let query = Item::new("INC2", "printer out of toner", "CRM");
        let label = assigner.assign_incident_subclass(&query, &log).await;

        assert_eq!(label.as_str(), "CRM_SubClass_2");
    }

    #[tokio::test]
    async fn test_new_cluster_numbering_counts_distinct_labels() {
        // Three existing clusters on mutually orthogonal vectors; the query
        // is orthogonal to all of them, so the fourth cluster is minted.
        let mock = MockEmbeddingBackend::new()
            .with_vector(key("first"), vec![1.0, 0.0, 0.0, 0.0])
            .with_vector(key("second"), vec![0.0, 1.0, 0.0, 0.0])
            .with_vector(key("third"), vec![0.0, 0.0, 1.0, 0.0])
            .with_vector(key("fourth"), vec![0.0, 0.0, 0.0, 1.0]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("X");
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            log.push(
                Item::new(format!("INC{}", i), *text, "X"),
                ClusterLabel::numbered("X", i + 1),
            );
        }

        let query = Item::new("INC9", "fourth", "X");
        let label = assigner.assign_incident_subclass(&query, &log).await;
        assert_eq!(label.as_str(), "X_SubClass_4");
    }

    #[tokio::test]
    async fn test_query_embed_failure_falls_back_to_new_cluster() {
        let mock = MockEmbeddingBackend::new().with_failing_text(key("broken query"));
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("CRM");
        log.push(
            Item::new("INC1", "app login fails", "CRM"),
            ClusterLabel::numbered("CRM", 1),
        );

        let query = Item::new("INC2", "broken query", "CRM");
        let label = assigner.assign_incident_subclass(&query, &log).await;
        assert_eq!(label.as_str(), "CRM_SubClass_2");
    }

    #[tokio::test]
    async fn test_candidate_embed_failure_drops_candidate() {
        // The failing candidate would otherwise be the best match; with its
        // score forced to 0.0 the vote falls to the other entry.
        let mock = MockEmbeddingBackend::new()
            .with_failing_text(key("unreachable text"))
            .with_vector(key("vpn tunnel drops"), vec![1.0, 0.0])
            .with_vector(key("vpn tunnel dropped"), vec![0.9, 0.19f32.sqrt()]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::for_owner("NET");
        log.push(
            Item::new("INC1", "unreachable text", "NET"),
            ClusterLabel::numbered("NET", 1),
        );
        log.push(
            Item::new("INC2", "vpn tunnel drops", "NET"),
            ClusterLabel::numbered("NET", 2),
        );

        let query = Item::new("INC3", "vpn tunnel dropped", "NET");
        let label = assigner.assign_incident_subclass(&query, &log).await;
        assert_eq!(label.as_str(), "NET_SubClass_2");
    }

    #[tokio::test]
    async fn test_step_assignment_unscoped_labels() {
        let mock = MockEmbeddingBackend::new()
            .with_vector(key("restarted the service"), vec![1.0, 0.0])
            .with_vector(key("restart of the service"), vec![0.9, 0.19f32.sqrt()])
            .with_vector(key("escalated to vendor"), vec![0.0, 1.0]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::unscoped();

        let first = Item::new("INC1:0", "restarted the service", "");
        assert_eq!(
            assigner.assign_step_subclass(&first, &log).await.as_str(),
            "SubClass_1"
        );
        log.push(first, ClusterLabel::unscoped(1));

        let second = Item::new("INC1:1", "restart of the service", "");
        assert_eq!(
            assigner.assign_step_subclass(&second, &log).await.as_str(),
            "SubClass_1"
        );
        log.push(second, ClusterLabel::unscoped(1));

        let third = Item::new("INC1:2", "escalated to vendor", "");
        assert_eq!(
            assigner.assign_step_subclass(&third, &log).await.as_str(),
            "SubClass_2"
        );
    }

    #[tokio::test]
    async fn test_step_assignment_has_no_exact_match_stage() {
        // Both texts share "error 500" but sit on orthogonal vectors; the
        // step path must ignore the code and mint a new cluster.
        let mock = MockEmbeddingBackend::new()
            .with_vector(key("db gave error 500"), vec![1.0, 0.0])
            .with_vector(key("mail relay error 500"), vec![0.0, 1.0]);
        let assigner = assigner(&mock);

        let mut log = LabeledLog::unscoped();
        log.push(
            Item::new("INC1:0", "db gave error 500", ""),
            ClusterLabel::unscoped(1),
        );

        let query = Item::new("INC1:1", "mail relay error 500", "");
        let label = assigner.assign_step_subclass(&query, &log).await;
        assert_eq!(label.as_str(), "SubClass_2");
    }
}
