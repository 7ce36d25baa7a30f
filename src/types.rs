//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::amount::amounts_equal;

/// The two ledgers being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerSource {
    /// Bank statement export
    Bank,
    /// Bookkeeping ("Ziher") export
    Other,
}

impl LedgerSource {
    /// Short tag used as the entry id prefix
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerSource::Bank => "bank",
            LedgerSource::Other => "other",
        }
    }

    /// Human-readable ledger name for messages
    pub fn label(&self) -> &'static str {
        match self {
            LedgerSource::Bank => "Bank",
            LedgerSource::Other => "Bookkeeping",
        }
    }
}

impl fmt::Display for LedgerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reconciliation status of a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not part of any match group
    Unmatched,
    /// Member of exactly one match group
    Matched,
    /// Pre-selected by the presentation layer; never assigned by the engine
    Candidate,
}

/// Denormalized copy of a counterpart entry, kept on matched entries for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub source: LedgerSource,
}

/// One parsed row from either ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// Session-unique identifier (`<source tag>-<uuid>`)
    pub id: String,
    /// Booking date
    pub date: NaiveDate,
    /// Free-text narrative
    pub description: String,
    /// Signed amount, positive for inflows
    pub amount: BigDecimal,
    /// Ledger the entry was read from
    pub source: LedgerSource,
    /// Current reconciliation status
    pub status: EntryStatus,
    /// Owning match group, set iff `status == Matched`
    pub match_id: Option<String>,
    /// Snapshots of every counterpart in the owning match group
    pub matched_entry_details: Vec<EntrySnapshot>,
    /// Raw field values of the source row
    pub original_row_data: Vec<String>,
}

impl TransactionEntry {
    /// Create a new unmatched entry
    pub fn new(
        id: String,
        source: LedgerSource,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            source,
            status: EntryStatus::Unmatched,
            match_id: None,
            matched_entry_details: Vec::new(),
            original_row_data: Vec::new(),
        }
    }

    /// Create a new unmatched entry with a freshly generated id
    pub fn generated(
        source: LedgerSource,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self::new(generate_entry_id(source), source, date, description, amount)
    }

    /// Attach the raw row the entry was parsed from
    pub fn with_original_row(mut self, row: Vec<String>) -> Self {
        self.original_row_data = row;
        self
    }

    /// Snapshot of this entry for a counterpart's `matched_entry_details`
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id.clone(),
            date: self.date,
            description: self.description.clone(),
            amount: self.amount.clone(),
            source: self.source,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == EntryStatus::Matched
    }

    pub fn is_unmatched(&self) -> bool {
        self.status == EntryStatus::Unmatched
    }

    /// `status == Matched` iff `match_id` is set iff `matched_entry_details` is non-empty
    pub fn is_consistent(&self) -> bool {
        let matched = self.is_matched();
        matched == self.match_id.is_some() && matched == !self.matched_entry_details.is_empty()
    }

    pub(crate) fn mark_matched(&mut self, match_id: &str, details: Vec<EntrySnapshot>) {
        self.status = EntryStatus::Matched;
        self.match_id = Some(match_id.to_string());
        self.matched_entry_details = details;
    }

    pub(crate) fn clear_match(&mut self) {
        self.status = EntryStatus::Unmatched;
        self.match_id = None;
        self.matched_entry_details.clear();
    }
}

/// How a match group came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Auto,
    Manual,
}

impl MatchType {
    /// Prefix used for generated match ids
    pub fn prefix(&self) -> &'static str {
        match self {
            MatchType::Auto => "auto",
            MatchType::Manual => "manual",
        }
    }
}

/// A reconciliation pairing between entries of both ledgers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// Unique id, prefixed by origin (`auto-` or `manual-`)
    pub id: String,
    #[serde(rename = "type")]
    pub match_type: MatchType,
    pub bank_entry_ids: Vec<String>,
    pub other_entry_ids: Vec<String>,
    /// Sum of bank-side amounts at match time
    pub bank_sum_in_match: BigDecimal,
    /// Sum of other-side amounts at match time
    pub other_sum_in_match: BigDecimal,
    /// Whether the two side sums differ at cent precision
    pub is_discrepancy: bool,
}

impl MatchGroup {
    /// Create a group with a freshly generated id
    pub fn new(
        match_type: MatchType,
        bank_entry_ids: Vec<String>,
        other_entry_ids: Vec<String>,
        bank_sum_in_match: BigDecimal,
        other_sum_in_match: BigDecimal,
    ) -> Self {
        let is_discrepancy = !amounts_equal(&bank_sum_in_match, &other_sum_in_match);
        Self {
            id: generate_match_id(match_type),
            match_type,
            bank_entry_ids,
            other_entry_ids,
            bank_sum_in_match,
            other_sum_in_match,
            is_discrepancy,
        }
    }

    /// Whether the entry belongs to this group on either side
    pub fn contains(&self, entry_id: &str) -> bool {
        self.entry_ids().any(|id| id == entry_id)
    }

    /// All member ids, bank side first
    pub fn entry_ids(&self) -> impl Iterator<Item = &str> {
        self.bank_entry_ids
            .iter()
            .chain(self.other_entry_ids.iter())
            .map(String::as_str)
    }

    /// Bank sum minus other sum, as recorded at match time
    pub fn difference(&self) -> BigDecimal {
        &self.bank_sum_in_match - &self.other_sum_in_match
    }
}

/// Generate a session-unique entry id for the given ledger
pub fn generate_entry_id(source: LedgerSource) -> String {
    format!("{}-{}", source.tag(), uuid::Uuid::new_v4())
}

/// Generate a match group id for the given origin
pub fn generate_match_id(match_type: MatchType) -> String {
    format!("{}-{}", match_type.prefix(), uuid::Uuid::new_v4())
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(
        "{ledger} CSV headers not recognized. Expected: {}. Found headers (lowercase): {}",
        quote_list(.expected),
        .found.join(", ")
    )]
    Format {
        ledger: LedgerSource,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Match registry error: {0}")]
    Registry(String),
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
