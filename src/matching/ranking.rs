//! Tie-break rankers for the automatic matching pass

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::traits::CandidateRanker;
use crate::types::*;

/// Prefers the counterpart booked closest in time
#[derive(Debug, Clone, Copy, Default)]
pub struct DateProximityRanker;

impl CandidateRanker for DateProximityRanker {
    fn score(&self, anchor: &TransactionEntry, candidate: &TransactionEntry) -> f64 {
        -(date_distance_days(anchor.date, candidate.date) as f64)
    }

    fn name(&self) -> &'static str {
        "date-proximity"
    }
}

/// Prefers the counterpart with the most similar description
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionSimilarityRanker;

impl CandidateRanker for DescriptionSimilarityRanker {
    fn score(&self, anchor: &TransactionEntry, candidate: &TransactionEntry) -> f64 {
        trigram_similarity(&anchor.description, &candidate.description)
    }

    fn name(&self) -> &'static str {
        "description-similarity"
    }
}

/// Absolute number of days between two dates
pub fn date_distance_days(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Jaccard similarity of the character trigram sets of two descriptions.
///
/// Both strings are lowercased and stripped of non-alphanumeric characters first.
/// Identical normalized strings score 1, an empty string scores 0.
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let left = trigrams(&a);
    let right = trigrams(&b);
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let common = left.intersection(&right).count();
    common as f64 / union as f64
}

fn normalize(text: &str) -> Vec<char> {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn trigrams(chars: &[char]) -> HashSet<[char; 3]> {
    chars
        .windows(3)
        .map(|window| [window[0], window[1], window[2]])
        .collect()
}

/// Index (into `candidates`) of the best scored candidate; the first one wins exact ties
pub fn select_best(
    ranker: &dyn CandidateRanker,
    anchor: &TransactionEntry,
    candidates: &[&TransactionEntry],
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = ranker.score(anchor, candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}
