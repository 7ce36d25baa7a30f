//! Record reading for delimited ledger exports

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::types::*;

/// A non-blank record and the line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the input text
    pub line_number: usize,
    pub fields: Vec<String>,
}

/// Read every non-blank record of `text`.
///
/// Fields are trimmed and rows may have any number of fields, so short footer rows
/// reach the row checks instead of failing the read. A leading byte order mark is ignored.
pub fn read_rows(text: &str, delimiter: u8) -> ReconcileResult<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line_number = record.position().map_or(0, |p| p.line() as usize);
        rows.push(RawRow {
            line_number,
            fields: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(rows)
}

// Whitespace-only lines come through as a single empty field
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(text: &str, delimiter: u8) -> Vec<Vec<String>> {
        read_rows(text, delimiter)
            .unwrap()
            .into_iter()
            .map(|row| row.fields)
            .collect()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(fields("a,b,c\n", b','), vec![vec!["a", "b", "c"]]);
        assert_eq!(fields(" a , b ,c \n", b','), vec![vec!["a", "b", "c"]]);
        assert_eq!(fields("a,,c\n", b','), vec![vec!["a", "", "c"]]);
        assert!(fields("", b',').is_empty());
    }

    #[test]
    fn test_quoted_delimiter() {
        assert_eq!(
            fields("01.02.2024,\"Rent, February\",\"-1 200,00\"\n", b','),
            vec![vec!["01.02.2024", "Rent, February", "-1 200,00"]]
        );
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            fields("\"Shop \"\"Corner\"\"\",5\n", b','),
            vec![vec!["Shop \"Corner\"", "5"]]
        );
    }

    #[test]
    fn test_tab_delimiter_keeps_commas() {
        assert_eq!(
            fields("2024-01-05\tFees, bank\tFV/1\t0,00\t12,50\n", b'\t'),
            vec![vec!["2024-01-05", "Fees, bank", "FV/1", "0,00", "12,50"]]
        );
    }

    #[test]
    fn test_crlf_and_short_rows() {
        assert_eq!(
            fields("a,b,c\r\nd\r\n", b','),
            vec![vec!["a", "b", "c"], vec!["d"]]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped_but_counted() {
        let rows = read_rows("\nh1,h2\n\n   \nx,y\n", b',').unwrap();
        let numbers: Vec<_> = rows.iter().map(|r| r.line_number).collect();
        assert_eq!(numbers, vec![2, 5]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        assert_eq!(
            fields("\u{feff}Zaksięgowano,Tytuł\n", b','),
            vec![vec!["Zaksięgowano", "Tytuł"]]
        );
    }
}
