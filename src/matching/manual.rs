//! User-directed N:M matching

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Result of a manual match attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualMatchOutcome {
    pub bank_entries: Vec<TransactionEntry>,
    pub other_entries: Vec<TransactionEntry>,
    /// `None` when a precondition failed; the collections are then unchanged
    pub match_group: Option<MatchGroup>,
}

/// Match the selected entries of both ledgers into one manual group.
///
/// Both selections must be non-empty and every selected id must name a currently
/// unmatched entry of its ledger; otherwise nothing changes and no group is returned.
/// `bank_sum` and `other_sum` are the caller's totals of the selection and decide the
/// discrepancy flag as given. Repeated ids in a selection count once.
pub fn manual_match<S: AsRef<str>>(
    selected_bank_ids: &[S],
    selected_other_ids: &[S],
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
    bank_sum: &BigDecimal,
    other_sum: &BigDecimal,
) -> ManualMatchOutcome {
    let bank_ids = dedup_ids(selected_bank_ids);
    let other_ids = dedup_ids(selected_other_ids);

    if let Err(reason) = check_selection(&bank_ids, bank)
        .and_then(|()| check_selection(&other_ids, other))
    {
        tracing::debug!(reason, "manual match rejected");
        return ManualMatchOutcome {
            bank_entries: bank.to_vec(),
            other_entries: other.to_vec(),
            match_group: None,
        };
    }

    let group = MatchGroup::new(
        MatchType::Manual,
        bank_ids,
        other_ids,
        bank_sum.clone(),
        other_sum.clone(),
    );

    let selected: Vec<EntrySnapshot> = bank
        .iter()
        .chain(other.iter())
        .filter(|entry| group.contains(&entry.id))
        .map(TransactionEntry::snapshot)
        .collect();

    let apply = |entries: &[TransactionEntry]| -> Vec<TransactionEntry> {
        entries
            .iter()
            .cloned()
            .map(|mut entry| {
                if group.contains(&entry.id) {
                    let counterparts = selected
                        .iter()
                        .filter(|snapshot| snapshot.id != entry.id)
                        .cloned()
                        .collect();
                    entry.mark_matched(&group.id, counterparts);
                }
                entry
            })
            .collect()
    };
    let bank_entries = apply(bank);
    let other_entries = apply(other);

    tracing::debug!(
        match_id = %group.id,
        bank = group.bank_entry_ids.len(),
        other = group.other_entry_ids.len(),
        discrepancy = group.is_discrepancy,
        "manual match created"
    );

    ManualMatchOutcome {
        bank_entries,
        other_entries,
        match_group: Some(group),
    }
}

fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        if !unique.iter().any(|seen| seen == id) {
            unique.push(id.to_string());
        }
    }
    unique
}

fn check_selection(ids: &[String], entries: &[TransactionEntry]) -> Result<(), &'static str> {
    if ids.is_empty() {
        return Err("empty selection");
    }
    for id in ids {
        match entries.iter().find(|entry| entry.id == *id) {
            None => return Err("unknown entry id"),
            Some(entry) if !entry.is_unmatched() => return Err("entry is not unmatched"),
            Some(_) => {}
        }
    }
    Ok(())
}
