//! Traits for input abstraction and matching extensibility

use async_trait::async_trait;

use crate::types::*;

/// Source of a ledger export's raw text
///
/// This lets a reconciliation session be fed from files, uploads held in memory,
/// or any other backend that can hand over the whole export as text.
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Read the complete export text
    async fn read_text(&self) -> ReconcileResult<String>;

    /// Name used in log output (file name, upload name, ...)
    fn name(&self) -> String;
}

/// Tie-break strategy used when several counterparts share the same amount
///
/// Higher scores are better. The automatic pass keeps the first candidate among
/// equally scored ones, so implementations need not break ties themselves.
pub trait CandidateRanker: Send + Sync {
    /// Score `candidate` as a counterpart for `anchor`
    fn score(&self, anchor: &TransactionEntry, candidate: &TransactionEntry) -> f64;

    /// Short name for log output
    fn name(&self) -> &'static str;
}
