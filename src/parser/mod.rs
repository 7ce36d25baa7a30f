//! Parsing of ledger exports into normalized transaction entries
//!
//! A missing required header is fatal for the whole file. Defective data rows
//! (blank lines, short rows, bad dates, empty descriptions, non-numeric amounts)
//! are skipped and never abort the parse.

pub mod date;
pub mod format;
pub mod reader;

pub use date::*;
pub use format::*;
pub use reader::*;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::amount::parse_amount;

/// Why a data row was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Fewer fields than the highest required column index
    InsufficientColumns { expected: usize, found: usize },
    /// Date cell in none of the accepted notations
    InvalidDate(String),
    /// Description fields empty after joining
    EmptyDescription,
    /// Non-empty amount cell that is not a number
    InvalidAmount(String),
}

/// A dropped data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line number in the input text
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Entries parsed from one export plus the rows that were dropped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseReport {
    pub entries: Vec<TransactionEntry>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse an export of the given ledger into unmatched entries
pub fn parse(text: &str, source: LedgerSource) -> ReconcileResult<Vec<TransactionEntry>> {
    Ok(parse_with_report(text, source)?.entries)
}

/// Parse an export and report which data rows were dropped and why
///
/// The header is the first non-blank record.
pub fn parse_with_report(text: &str, source: LedgerSource) -> ReconcileResult<ParseReport> {
    let format = SourceFormat::for_source(source);
    let mut rows = read_rows(text, format.delimiter)?.into_iter();

    let headers: Vec<String> = rows
        .next()
        .map(|row| row.fields)
        .unwrap_or_default()
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    let layout = format.locate(&headers)?;

    let mut report = ParseReport::default();
    for RawRow {
        line_number,
        fields,
    } in rows
    {
        match parse_row(format, &layout, fields) {
            Ok(entry) => report.entries.push(entry),
            Err(reason) => {
                tracing::trace!(%source, line_number, ?reason, "skipping row");
                report.skipped.push(SkippedRow {
                    line_number,
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        %source,
        parsed = report.entries.len(),
        skipped = report.skipped.len(),
        "parsed ledger export"
    );
    Ok(report)
}

fn parse_row(
    format: &SourceFormat,
    layout: &ColumnLayout,
    fields: Vec<String>,
) -> Result<TransactionEntry, SkipReason> {
    if fields.len() <= layout.max_index() {
        return Err(SkipReason::InsufficientColumns {
            expected: layout.max_index() + 1,
            found: fields.len(),
        });
    }

    let raw_date = &fields[layout.date];
    let date = parse_date(raw_date, format.date_notations)
        .ok_or_else(|| SkipReason::InvalidDate(raw_date.clone()))?;

    let description = layout
        .description
        .iter()
        .map(|&index| fields[index].as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if description.is_empty() {
        return Err(SkipReason::EmptyDescription);
    }

    let amount = extract_amount(layout.amount, &fields)?;

    Ok(TransactionEntry::generated(format.source, date, description, amount)
        .with_original_row(fields))
}

fn extract_amount(indices: AmountIndices, fields: &[String]) -> Result<BigDecimal, SkipReason> {
    match indices {
        AmountIndices::Signed(index) => amount_cell(&fields[index]),
        AmountIndices::IncomeExpense { income, expense } => {
            Ok(amount_cell(&fields[income])? - amount_cell(&fields[expense])?)
        }
    }
}

// Empty cells count as zero
fn amount_cell(raw: &str) -> Result<BigDecimal, SkipReason> {
    if raw.trim().is_empty() {
        return Ok(BigDecimal::from(0));
    }
    parse_amount(raw).ok_or_else(|| SkipReason::InvalidAmount(raw.to_string()))
}
