//! Similarity scoring and neighbor voting.

use triage_core::{ClusterLabel, MatchOutcome, Vector};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude, so degenerate
/// embeddings never match anything.
pub fn cosine_similarity(a: &Vector, b: &Vector) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a > 0.0 && mag_b > 0.0 {
        dot / (mag_a * mag_b)
    } else {
        0.0
    }
}

/// Similarity score used for cluster matching: folds cosine similarity so
/// that 1.0 means identical direction and the score decreases symmetrically
/// on either side of it.
pub fn similarity_metric(a: &Vector, b: &Vector) -> f32 {
    1.0 - (1.0 - cosine_similarity(a, b)).abs()
}

/// Pick a label from scored candidates by thresholded k-nearest majority.
///
/// Candidates scoring at or below `threshold` are discarded (the threshold
/// is strict). The `k` highest-scoring survivors vote; the label with the
/// most votes wins. Ordering is stable throughout: among equal scores the
/// earlier log entry ranks first, and a vote tie goes to the label that
/// appeared first among the top `k`.
pub fn majority_vote(
    scored: Vec<(f32, ClusterLabel)>,
    threshold: f32,
    k: usize,
) -> MatchOutcome {
    let mut survivors: Vec<(f32, ClusterLabel)> = scored
        .into_iter()
        .filter(|(score, _)| *score > threshold)
        .collect();

    if survivors.is_empty() || k == 0 {
        return MatchOutcome::NotFound;
    }

    // Stable sort keeps log order among equal scores.
    survivors.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    survivors.truncate(k);

    // Tally in first-appearance order so a vote tie resolves to the label
    // seen earliest among the top k.
    let mut tally: Vec<(ClusterLabel, usize)> = Vec::new();
    for (_, label) in survivors {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut winner = tally.remove(0);
    for candidate in tally {
        if candidate.1 > winner.1 {
            winner = candidate;
        }
    }

    MatchOutcome::Found(winner.0)
}
