//! Dissolving match groups

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Result of dissolving a match group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchOutcome {
    pub bank_entries: Vec<TransactionEntry>,
    pub other_entries: Vec<TransactionEntry>,
    /// Number of entries reset across both ledgers
    pub affected: usize,
}

/// Reset every entry of the given match group to unmatched.
///
/// Only entries are touched; removing the group from the registry is up to the
/// caller. An unknown id affects nothing.
pub fn unmatch(
    match_id: &str,
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
) -> UnmatchOutcome {
    let mut affected = 0;
    let mut reset = |entries: &[TransactionEntry]| -> Vec<TransactionEntry> {
        entries
            .iter()
            .cloned()
            .map(|mut entry| {
                if entry.match_id.as_deref() == Some(match_id) {
                    entry.clear_match();
                    affected += 1;
                }
                entry
            })
            .collect()
    };
    let bank_entries = reset(bank);
    let other_entries = reset(other);

    tracing::debug!(match_id, affected, "unmatched entries");

    UnmatchOutcome {
        bank_entries,
        other_entries,
        affected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::auto::auto_match_default;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn entry(id: &str, source: LedgerSource, amount: i32) -> TransactionEntry {
        TransactionEntry::new(
            id.to_string(),
            source,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "Transfer".to_string(),
            BigDecimal::from(amount),
        )
    }

    fn matched_pairs() -> (Vec<TransactionEntry>, Vec<TransactionEntry>, Vec<MatchGroup>) {
        let outcome = auto_match_default(
            &[entry("b1", LedgerSource::Bank, 5), entry("b2", LedgerSource::Bank, 7)],
            &[entry("o1", LedgerSource::Other, 5), entry("o2", LedgerSource::Other, 7)],
        );
        (outcome.bank_entries, outcome.other_entries, outcome.match_groups)
    }

    #[test]
    fn test_unmatch_resets_only_target_group() {
        let (bank, other, groups) = matched_pairs();
        let outcome = unmatch(&groups[0].id, &bank, &other);

        assert_eq!(outcome.affected, 2);
        assert!(outcome.bank_entries[0].is_unmatched());
        assert!(outcome.bank_entries[0].match_id.is_none());
        assert!(outcome.bank_entries[0].matched_entry_details.is_empty());
        assert!(outcome.other_entries[0].is_unmatched());

        assert_eq!(outcome.bank_entries[1], bank[1]);
        assert_eq!(outcome.other_entries[1], other[1]);
    }

    #[test]
    fn test_unmatch_is_idempotent() {
        let (bank, other, groups) = matched_pairs();
        let once = unmatch(&groups[1].id, &bank, &other);
        let twice = unmatch(&groups[1].id, &once.bank_entries, &once.other_entries);

        assert_eq!(twice.affected, 0);
        assert_eq!(twice.bank_entries, once.bank_entries);
        assert_eq!(twice.other_entries, once.other_entries);
    }

    #[test]
    fn test_unknown_match_id_is_noop() {
        let (bank, other, _) = matched_pairs();
        let outcome = unmatch("manual-does-not-exist", &bank, &other);
        assert_eq!(outcome.affected, 0);
        assert_eq!(outcome.bank_entries, bank);
        assert_eq!(outcome.other_entries, other);
    }
}
