//! Consistency checks across entries and the match registry

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::registry::MatchRegistry;
use crate::types::*;

/// Report on session consistency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub matched_entries: usize,
    pub match_groups: usize,
}

/// Validate that an entry's status, match id and counterpart snapshots agree
pub fn validate_entry(entry: &TransactionEntry) -> ReconcileResult<()> {
    if entry.is_consistent() {
        Ok(())
    } else {
        Err(ReconcileError::Registry(format!(
            "Entry '{}' is inconsistent: status = {:?}, match id = {:?}, {} counterpart snapshot(s)",
            entry.id,
            entry.status,
            entry.match_id,
            entry.matched_entry_details.len()
        )))
    }
}

/// Check both ledgers against each other and against the registry
pub fn check_integrity(
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
    registry: &MatchRegistry,
) -> IntegrityReport {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for entry in bank.iter().chain(other.iter()) {
        if !seen.insert(entry.id.as_str()) {
            issues.push(format!("Entry id '{}' appears more than once", entry.id));
        }
        if let Err(err) = validate_entry(entry) {
            issues.push(err.to_string());
        }
    }

    for (entries, source) in [(bank, LedgerSource::Bank), (other, LedgerSource::Other)] {
        if let Some(entry) = entries.iter().find(|e| e.source != source) {
            issues.push(format!(
                "Entry '{}' from {} is stored with the {} entries",
                entry.id, entry.source, source
            ));
        }
    }

    // Members per match id, as recorded on the entries
    let mut members: HashMap<&str, Vec<&TransactionEntry>> = HashMap::new();
    for entry in bank.iter().chain(other.iter()) {
        if let Some(match_id) = entry.match_id.as_deref() {
            members.entry(match_id).or_default().push(entry);
        }
    }

    for (match_id, group_entries) in &members {
        match registry.get(match_id) {
            None => issues.push(format!("Match group '{}' is not registered", match_id)),
            Some(group) => {
                for entry in group_entries {
                    let listed = match entry.source {
                        LedgerSource::Bank => &group.bank_entry_ids,
                        LedgerSource::Other => &group.other_entry_ids,
                    };
                    if !listed.contains(&entry.id) {
                        issues.push(format!(
                            "Entry '{}' claims match group '{}' which does not list it",
                            entry.id, match_id
                        ));
                    }
                }
            }
        }

        for entry in group_entries {
            for partner in group_entries.iter().filter(|p| p.id != entry.id) {
                if !entry.matched_entry_details.iter().any(|d| d.id == partner.id) {
                    issues.push(format!(
                        "Entry '{}' is missing the snapshot of its counterpart '{}'",
                        entry.id, partner.id
                    ));
                }
            }
        }
    }

    for group in registry {
        let recorded = members.get(group.id.as_str()).map_or(0, Vec::len);
        let expected = group.bank_entry_ids.len() + group.other_entry_ids.len();
        if recorded != expected {
            issues.push(format!(
                "Match group '{}' lists {} entries but {} entries reference it",
                group.id, expected, recorded
            ));
        }
    }

    IntegrityReport {
        is_valid: issues.is_empty(),
        issues,
        matched_entries: bank
            .iter()
            .chain(other.iter())
            .filter(|e| e.is_matched())
            .count(),
        match_groups: registry.len(),
    }
}
