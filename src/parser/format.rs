//! Per-ledger export layouts: delimiter, required headers and date notations

use crate::parser::date::DateNotation;
use crate::types::*;

/// How the signed amount of a row is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// A single signed column
    Signed(&'static str),
    /// Two nonnegative columns combined as `income - expense`
    IncomeExpense {
        income: &'static str,
        expense: &'static str,
    },
}

/// Layout of one ledger export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormat {
    pub source: LedgerSource,
    /// Field delimiter byte handed to the CSV reader
    pub delimiter: u8,
    pub date_header: &'static str,
    /// Joined with a single space, in this order
    pub description_headers: &'static [&'static str],
    pub amount: AmountColumns,
    /// Tried in order
    pub date_notations: &'static [DateNotation],
}

/// Bank statement export: comma separated, `DD.MM.YYYY` dates, signed amounts
pub const BANK_FORMAT: SourceFormat = SourceFormat {
    source: LedgerSource::Bank,
    delimiter: b',',
    date_header: "Zaksięgowano",
    description_headers: &["Tytuł"],
    amount: AmountColumns::Signed("Kwota"),
    date_notations: &[DateNotation::DayMonthYearDotted],
};

/// Bookkeeping export: tab separated, ISO dates with a dotted fallback, income/expense totals
pub const OTHER_FORMAT: SourceFormat = SourceFormat {
    source: LedgerSource::Other,
    delimiter: b'\t',
    date_header: "Data",
    description_headers: &["Opis", "Numer dokumentu"],
    amount: AmountColumns::IncomeExpense {
        income: "Wpływy razem",
        expense: "Wydatki razem",
    },
    date_notations: &[
        DateNotation::YearMonthDayDashed,
        DateNotation::DayMonthYearDotted,
    ],
};

/// Column indices of the required fields within a data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: Vec<usize>,
    pub amount: AmountIndices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountIndices {
    Signed(usize),
    IncomeExpense { income: usize, expense: usize },
}

impl ColumnLayout {
    /// Highest column index a row must reach
    pub fn max_index(&self) -> usize {
        let amount_max = match self.amount {
            AmountIndices::Signed(index) => index,
            AmountIndices::IncomeExpense { income, expense } => income.max(expense),
        };
        self.description
            .iter()
            .copied()
            .chain([self.date, amount_max])
            .max()
            .unwrap_or(self.date)
    }
}

impl SourceFormat {
    /// Layout for the given ledger
    pub fn for_source(source: LedgerSource) -> &'static SourceFormat {
        match source {
            LedgerSource::Bank => &BANK_FORMAT,
            LedgerSource::Other => &OTHER_FORMAT,
        }
    }

    /// Required headers in display casing
    pub fn expected_headers(&self) -> Vec<&'static str> {
        let mut headers = vec![self.date_header];
        headers.extend_from_slice(self.description_headers);
        match self.amount {
            AmountColumns::Signed(amount) => headers.push(amount),
            AmountColumns::IncomeExpense { income, expense } => {
                headers.push(income);
                headers.push(expense);
            }
        }
        headers
    }

    /// Locate required columns in a lowercased header row
    pub fn locate(&self, headers: &[String]) -> ReconcileResult<ColumnLayout> {
        self.try_locate(headers)
            .ok_or_else(|| ReconcileError::Format {
                ledger: self.source,
                expected: self
                    .expected_headers()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                found: headers.to_vec(),
            })
    }

    fn try_locate(&self, headers: &[String]) -> Option<ColumnLayout> {
        let find = |name: &str| {
            let name = name.to_lowercase();
            headers.iter().position(|h| *h == name)
        };

        let date = find(self.date_header)?;
        let description = self
            .description_headers
            .iter()
            .map(|h| find(h))
            .collect::<Option<Vec<_>>>()?;
        let amount = match self.amount {
            AmountColumns::Signed(amount) => AmountIndices::Signed(find(amount)?),
            AmountColumns::IncomeExpense { income, expense } => AmountIndices::IncomeExpense {
                income: find(income)?,
                expense: find(expense)?,
            },
        };

        Some(ColumnLayout {
            date,
            description,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_locate_bank_columns() {
        let layout = BANK_FORMAT
            .locate(&headers(&["waluta", "zaksięgowano", "kwota", "tytuł"]))
            .unwrap();
        assert_eq!(layout.date, 1);
        assert_eq!(layout.description, vec![3]);
        assert_eq!(layout.amount, AmountIndices::Signed(2));
        assert_eq!(layout.max_index(), 3);
    }

    #[test]
    fn test_locate_other_columns() {
        let layout = OTHER_FORMAT
            .locate(&headers(&[
                "lp",
                "data",
                "numer dokumentu",
                "opis",
                "wpływy razem",
                "wydatki razem",
            ]))
            .unwrap();
        assert_eq!(layout.description, vec![3, 2]);
        assert_eq!(
            layout.amount,
            AmountIndices::IncomeExpense {
                income: 4,
                expense: 5
            }
        );
        assert_eq!(layout.max_index(), 5);
    }

    #[test]
    fn test_missing_header_reports_expected_and_found() {
        let err = BANK_FORMAT
            .locate(&headers(&["zaksięgowano", "tytuł"]))
            .unwrap_err();
        match err {
            ReconcileError::Format {
                ledger,
                expected,
                found,
            } => {
                assert_eq!(ledger, LedgerSource::Bank);
                assert_eq!(expected, vec!["Zaksięgowano", "Tytuł", "Kwota"]);
                assert_eq!(found, vec!["zaksięgowano", "tytuł"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
