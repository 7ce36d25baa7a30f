//! Automatic one-to-one matching by amount with a pluggable tie-break

use serde::{Deserialize, Serialize};

use crate::matching::ranking::{select_best, DateProximityRanker};
use crate::traits::CandidateRanker;
use crate::types::*;
use crate::utils::amount::amounts_equal;

/// Result of an automatic matching pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMatchOutcome {
    pub bank_entries: Vec<TransactionEntry>,
    pub other_entries: Vec<TransactionEntry>,
    /// Groups created by this pass, in bank entry order
    pub match_groups: Vec<MatchGroup>,
}

/// Pair unmatched bank entries with unmatched other-ledger entries of equal amount.
///
/// Greedy and order dependent: bank entries are visited in order and each takes the
/// best ranked unmatched counterpart whose amount equals its own at cent precision.
/// A paired counterpart is never offered again in the same pass. Entries that are
/// already matched are kept as they are; any other status is reset to unmatched.
/// The input collections are not modified.
pub fn auto_match(
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
    ranker: &dyn CandidateRanker,
) -> AutoMatchOutcome {
    let mut bank_entries = reset_unmatched(bank);
    let mut other_entries = reset_unmatched(other);
    let mut match_groups = Vec::new();

    for bank_index in 0..bank_entries.len() {
        if bank_entries[bank_index].is_matched() {
            continue;
        }

        let bank_entry = &bank_entries[bank_index];
        let pool: Vec<usize> = other_entries
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                candidate.is_unmatched() && amounts_equal(&candidate.amount, &bank_entry.amount)
            })
            .map(|(index, _)| index)
            .collect();

        let chosen = match pool.as_slice() {
            [] => continue,
            [only] => *only,
            _ => {
                let candidates: Vec<&TransactionEntry> =
                    pool.iter().map(|&index| &other_entries[index]).collect();
                match select_best(ranker, bank_entry, &candidates) {
                    Some(position) => pool[position],
                    None => continue,
                }
            }
        };

        let group = MatchGroup::new(
            MatchType::Auto,
            vec![bank_entry.id.clone()],
            vec![other_entries[chosen].id.clone()],
            bank_entry.amount.clone(),
            other_entries[chosen].amount.clone(),
        );
        tracing::trace!(
            match_id = %group.id,
            bank_entry = %bank_entry.id,
            other_entry = %other_entries[chosen].id,
            candidates = pool.len(),
            "auto-matched pair"
        );

        let bank_snapshot = bank_entry.snapshot();
        let other_snapshot = other_entries[chosen].snapshot();
        bank_entries[bank_index].mark_matched(&group.id, vec![other_snapshot]);
        other_entries[chosen].mark_matched(&group.id, vec![bank_snapshot]);
        match_groups.push(group);
    }

    tracing::debug!(
        ranker = ranker.name(),
        bank = bank_entries.len(),
        other = other_entries.len(),
        matched = match_groups.len(),
        "automatic matching pass finished"
    );

    AutoMatchOutcome {
        bank_entries,
        other_entries,
        match_groups,
    }
}

/// Automatic pass using the date proximity tie-break
pub fn auto_match_default(bank: &[TransactionEntry], other: &[TransactionEntry]) -> AutoMatchOutcome {
    auto_match(bank, other, &DateProximityRanker)
}

fn reset_unmatched(entries: &[TransactionEntry]) -> Vec<TransactionEntry> {
    entries
        .iter()
        .cloned()
        .map(|mut entry| {
            if !entry.is_matched() {
                entry.clear_match();
            }
            entry
        })
        .collect()
}
