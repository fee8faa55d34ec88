//! Demographic-weighted cosine ranking of candidate destinations.
//!
//! Only dimensions where both the user and the destination report spend take
//! part in the cosine. Each destination carries one weight, derived from how
//! much the user's demographic spends there, applied to every surviving
//! dimension of both vectors.

use crate::models::{CategoryVector, RankedResult};

use super::vector_builder::Candidate;

pub const DEFAULT_ALPHA: f64 = 0.9;
pub const DEFAULT_TOP_N: usize = 5;

/// Scores candidates against a user vector and keeps the best `top_n`
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker {
    alpha: f64,
    top_n: usize,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_TOP_N)
    }
}

impl SimilarityRanker {
    pub fn new(alpha: f64, top_n: usize) -> Self {
        Self { alpha, top_n }
    }

    /// Ranks candidates by descending similarity.
    ///
    /// Ties keep candidate order. The result holds at most `top_n` entries.
    pub fn rank(&self, user: &CategoryVector, candidates: &[Candidate]) -> Vec<RankedResult> {
        let basis: Vec<f64> = candidates.iter().map(|c| c.demographic_basis).collect();
        let weights = min_max_scale(&basis)
            .into_iter()
            .map(|w| compress_weight(w, self.alpha));

        let mut ranked: Vec<RankedResult> = candidates
            .iter()
            .zip(weights)
            .map(|(candidate, weight)| RankedResult {
                destination: candidate.destination.clone(),
                similarity: round4(overlap_similarity(user, &candidate.vector, weight)),
            })
            .collect();

        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked.truncate(self.top_n);

        tracing::debug!(
            candidates = candidates.len(),
            kept = ranked.len(),
            best = ranked.first().map(|r| r.similarity),
            "Ranked candidates"
        );

        ranked
    }
}

/// Scales values linearly onto [0, 1].
///
/// With fewer than two distinct values every output is 0.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

/// Pulls a scaled weight toward 1: `1 + alpha * (w - 1)`
pub fn compress_weight(weight: f64, alpha: f64) -> f64 {
    1.0 + alpha * (weight - 1.0)
}

/// Cosine similarity over the dimensions where both vectors are non-zero,
/// after multiplying both by `weight`.
///
/// Each filtered vector is divided by its largest magnitude before squaring,
/// so very large spend does not overflow. Returns 0 when no dimension
/// overlaps. Clamped to [0, 1].
pub fn overlap_similarity(user: &CategoryVector, candidate: &CategoryVector, weight: f64) -> f64 {
    let pairs: Vec<(f64, f64)> = user
        .iter()
        .zip(candidate.iter())
        .filter(|&(&u, &c)| u != 0.0 && c != 0.0)
        .map(|(&u, &c)| (u * weight, c * weight))
        .collect();

    if pairs.is_empty() {
        return 0.0;
    }

    let scale_user = pairs.iter().fold(0.0_f64, |m, &(u, _)| m.max(u.abs()));
    let scale_candidate = pairs.iter().fold(0.0_f64, |m, &(_, c)| m.max(c.abs()));
    if scale_user == 0.0 || scale_candidate == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_user = 0.0;
    let mut norm_candidate = 0.0;
    for (u, c) in pairs {
        let (u, c) = (u / scale_user, c / scale_candidate);
        dot += u * c;
        norm_user += u * u;
        norm_candidate += c * c;
    }

    let result = dot / (norm_user.sqrt() * norm_candidate.sqrt());
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(0.0, 1.0)
}

/// Rounds half-to-even at 4 decimal places
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}
