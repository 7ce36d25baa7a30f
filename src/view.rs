//! Derived views: mode filtering, text search, totals and the unmatched list

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::amount::{display_amount, is_effectively_zero, plain_amount};

/// Which entries enter totals and lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    /// Only entries with a positive amount
    Income,
    /// Only entries with a negative amount
    Expenses,
}

impl FilterMode {
    pub fn accepts(&self, entry: &TransactionEntry) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Income => entry.amount > BigDecimal::zero(),
            FilterMode::Expenses => entry.amount < BigDecimal::zero(),
        }
    }
}

/// Ledger totals after mode filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub bank_total: BigDecimal,
    pub other_total: BigDecimal,
    /// `bank_total - other_total`
    pub difference: BigDecimal,
}

impl Totals {
    /// Difference below half a cent
    pub fn is_balanced(&self) -> bool {
        is_effectively_zero(&self.difference)
    }

    /// Difference rounded for display, never a negative zero
    pub fn display_difference(&self) -> BigDecimal {
        display_amount(&self.difference)
    }
}

pub fn filter_by_mode(entries: &[TransactionEntry], mode: FilterMode) -> Vec<TransactionEntry> {
    entries.iter().filter(|e| mode.accepts(e)).cloned().collect()
}

/// Case-insensitive substring search over description, amount and ISO date.
///
/// A blank query keeps every entry.
pub fn search_entries(entries: &[TransactionEntry], query: &str) -> Vec<TransactionEntry> {
    if query.trim().is_empty() {
        return entries.to_vec();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.description.to_lowercase().contains(&needle)
                || plain_amount(&entry.amount).contains(&needle)
                || entry.date.to_string().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Stable sort by ascending date
pub fn sort_by_date(mut entries: Vec<TransactionEntry>) -> Vec<TransactionEntry> {
    entries.sort_by_key(|entry| entry.date);
    entries
}

pub fn sum_amounts(entries: &[TransactionEntry]) -> BigDecimal {
    entries.iter().map(|e| &e.amount).sum()
}

/// Totals of both ledgers with the mode filter applied to each side
pub fn compute_totals(
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
    mode: FilterMode,
) -> Totals {
    let bank_total = sum_amounts(&filter_by_mode(bank, mode));
    let other_total = sum_amounts(&filter_by_mode(other, mode));
    let difference = &bank_total - &other_total;
    Totals {
        bank_total,
        other_total,
        difference,
    }
}

/// Per-ledger table: mode filter and search, all statuses
pub fn displayed_entries(
    entries: &[TransactionEntry],
    mode: FilterMode,
    query: &str,
) -> Vec<TransactionEntry> {
    search_entries(&filter_by_mode(entries, mode), query)
}

/// Unmatched entries of both ledgers after mode filter and search, sorted by date
pub fn unmatched_combined(
    bank: &[TransactionEntry],
    other: &[TransactionEntry],
    mode: FilterMode,
    query: &str,
) -> Vec<TransactionEntry> {
    let mut combined = displayed_entries(bank, mode, query);
    combined.extend(displayed_entries(other, mode, query));
    combined.retain(TransactionEntry::is_unmatched);
    sort_by_date(combined)
}

/// At least one entry exists and every entry of both ledgers is matched
pub fn all_matched(bank: &[TransactionEntry], other: &[TransactionEntry]) -> bool {
    (!bank.is_empty() || !other.is_empty())
        && bank.iter().chain(other.iter()).all(TransactionEntry::is_matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn entry(id: &str, source: LedgerSource, day: u32, amount: &str, description: &str) -> TransactionEntry {
        TransactionEntry::new(
            id.to_string(),
            source,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            description.to_string(),
            dec(amount),
        )
    }

    fn ledgers() -> (Vec<TransactionEntry>, Vec<TransactionEntry>) {
        (
            vec![
                entry("b1", LedgerSource::Bank, 12, "100.00", "Membership fees"),
                entry("b2", LedgerSource::Bank, 3, "-12.50", "Bank charge"),
                entry("b3", LedgerSource::Bank, 7, "0.10", "Interest"),
            ],
            vec![
                entry("o1", LedgerSource::Other, 5, "100.00", "Fees KP/1"),
                entry("o2", LedgerSource::Other, 9, "-12.40", "Charges"),
            ],
        )
    }

    #[test]
    fn test_mode_filter() {
        let (bank, _) = ledgers();
        let ids = |v: Vec<TransactionEntry>| v.into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(filter_by_mode(&bank, FilterMode::All)), vec!["b1", "b2", "b3"]);
        assert_eq!(ids(filter_by_mode(&bank, FilterMode::Income)), vec!["b1", "b3"]);
        assert_eq!(ids(filter_by_mode(&bank, FilterMode::Expenses)), vec!["b2"]);
    }

    #[test]
    fn test_totals_per_mode() {
        let (bank, other) = ledgers();
        let all = compute_totals(&bank, &other, FilterMode::All);
        assert_eq!(all.bank_total, dec("87.60"));
        assert_eq!(all.other_total, dec("87.60"));
        assert!(all.is_balanced());
        assert_eq!(all.display_difference().to_string(), "0.00");

        let expenses = compute_totals(&bank, &other, FilterMode::Expenses);
        assert_eq!(expenses.difference, dec("-0.10"));
        assert!(!expenses.is_balanced());
    }

    #[test]
    fn test_near_zero_difference_is_balanced() {
        let bank = vec![entry("b1", LedgerSource::Bank, 1, "10.004", "x")];
        let other = vec![entry("o1", LedgerSource::Other, 1, "10.006", "x")];
        let totals = compute_totals(&bank, &other, FilterMode::All);
        assert!(totals.is_balanced());
        assert_eq!(totals.display_difference().to_string(), "0.00");
    }

    #[test]
    fn test_search() {
        let (bank, _) = ledgers();
        let ids = |v: Vec<TransactionEntry>| v.into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(search_entries(&bank, "FEES")), vec!["b1"]);
        assert_eq!(ids(search_entries(&bank, "-12.5")), vec!["b2"]);
        assert_eq!(ids(search_entries(&bank, "2024-01-07")), vec!["b3"]);
        assert_eq!(ids(search_entries(&bank, "   ")).len(), 3);
        assert!(search_entries(&bank, "nothing like this").is_empty());
    }

    #[test]
    fn test_unmatched_combined_sorted_by_date() {
        let (mut bank, other) = ledgers();
        bank[0].mark_matched("auto-x", vec![other[0].snapshot()]);

        let combined = unmatched_combined(&bank, &other, FilterMode::All, "");
        let ids: Vec<_> = combined.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "o1", "b3", "o2"]);

        let income = unmatched_combined(&bank, &other, FilterMode::Income, "");
        let ids: Vec<_> = income.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["o1", "b3"]);
    }

    #[test]
    fn test_all_matched() {
        assert!(!all_matched(&[], &[]));
        let (mut bank, other) = ledgers();
        assert!(!all_matched(&bank, &other));
        for e in bank.iter_mut() {
            e.mark_matched("manual-x", vec![other[0].snapshot()]);
        }
        assert!(all_matched(&bank, &[]));
    }
}
