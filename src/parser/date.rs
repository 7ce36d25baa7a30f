//! Date notations accepted in ledger exports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A date notation a ledger export may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateNotation {
    /// `DD.MM.YYYY`, day and month with one or two digits
    DayMonthYearDotted,
    /// `YYYY-MM-DD`, month and day with one or two digits
    YearMonthDayDashed,
}

impl DateNotation {
    fn pattern(&self) -> &'static str {
        match self {
            DateNotation::DayMonthYearDotted => "%d.%m.%Y",
            DateNotation::YearMonthDayDashed => "%Y-%m-%d",
        }
    }

    fn year_part<'a>(&self, raw: &'a str) -> Option<&'a str> {
        match self {
            DateNotation::DayMonthYearDotted => raw.rsplit('.').next(),
            DateNotation::YearMonthDayDashed => raw.split('-').next(),
        }
    }

    /// Parse `raw` in this notation; the year must have exactly four digits
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let year = self.year_part(raw)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(raw, self.pattern()).ok()
    }
}

/// Try each notation in order and return the first successful parse
pub fn parse_date(raw: &str, notations: &[DateNotation]) -> Option<NaiveDate> {
    let raw = raw.trim();
    notations.iter().find_map(|notation| notation.parse(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dotted_dates() {
        let n = DateNotation::DayMonthYearDotted;
        assert_eq!(n.parse("10.01.2024"), Some(ymd(2024, 1, 10)));
        assert_eq!(n.parse("1.2.2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(n.parse("29.02.2023"), None);
        assert_eq!(n.parse("2024-01-10"), None);
        assert_eq!(n.parse("10.01.24"), None);
        assert_eq!(n.parse("10.01.2024.5"), None);
        assert_eq!(n.parse("10.01.02024"), None);
    }

    #[test]
    fn test_dashed_dates() {
        let n = DateNotation::YearMonthDayDashed;
        assert_eq!(n.parse("2024-01-10"), Some(ymd(2024, 1, 10)));
        assert_eq!(n.parse("2024-1-5"), Some(ymd(2024, 1, 5)));
        assert_eq!(n.parse("2024-13-01"), None);
        assert_eq!(n.parse("2024-001-01"), None);
        assert_eq!(n.parse("10.01.2024"), None);
    }

    #[test]
    fn test_priority_order() {
        let notations = [
            DateNotation::YearMonthDayDashed,
            DateNotation::DayMonthYearDotted,
        ];
        assert_eq!(parse_date(" 2024-03-07 ", &notations), Some(ymd(2024, 3, 7)));
        assert_eq!(parse_date("07.03.2024", &notations), Some(ymd(2024, 3, 7)));
        assert_eq!(parse_date("March 7th", &notations), None);
        assert_eq!(parse_date("", &notations), None);
    }
}
