//! Date range selection and validation
//!
//! A range query is only issued once both ends are chosen and ordered. An
//! inverted range is rejected, never swapped.

use chrono::NaiveDate;
use thiserror::Error;

/// Date format used by the APOD API and the date entry fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// User-chosen start and end dates, possibly incomplete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Why a selection cannot be queried yet
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RangeRejection {
    /// One or both dates still missing; the caller stays silent
    #[error("date range is incomplete")]
    Incomplete,

    /// Start comes after end
    #[error("start date {start} must be on or before end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// An inclusive, ordered date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeRejection> {
        if start > end {
            return Err(RangeRejection::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl DateRangeSelection {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Checks presence first, then ordering
    pub fn validate(&self) -> Result<DateRange, RangeRejection> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => Err(RangeRejection::Incomplete),
        }
    }

    /// Returns true once both dates are chosen
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_missing_start_is_incomplete() {
        let selection = DateRangeSelection::new(None, Some(date("2025-08-03")));
        assert_eq!(selection.validate(), Err(RangeRejection::Incomplete));
    }

    #[test]
    fn test_missing_end_is_incomplete() {
        let selection = DateRangeSelection::new(Some(date("2025-08-01")), None);
        assert_eq!(selection.validate(), Err(RangeRejection::Incomplete));
        assert!(!selection.is_complete());
    }

    #[test]
    fn test_empty_selection_is_incomplete() {
        assert_eq!(
            DateRangeSelection::default().validate(),
            Err(RangeRejection::Incomplete)
        );
    }

    #[test]
    fn test_inverted_range_is_rejected_not_swapped() {
        let selection = DateRangeSelection::new(Some(date("2025-08-03")), Some(date("2025-08-01")));
        let result = selection.validate();
        assert_eq!(
            result,
            Err(RangeRejection::Inverted {
                start: date("2025-08-03"),
                end: date("2025-08-01"),
            })
        );
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let selection = DateRangeSelection::new(Some(date("2025-08-02")), Some(date("2025-08-02")));
        let range = selection.validate().unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_ordered_range_is_valid() {
        let selection = DateRangeSelection::new(Some(date("2025-08-01")), Some(date("2025-08-03")));
        let range = selection.validate().unwrap();
        assert_eq!(range.days(), 3);
        assert_eq!(range.to_string(), "2025-08-01..2025-08-03");
    }

    #[test]
    fn test_clear_resets_both_dates() {
        let mut selection = DateRangeSelection::new(Some(date("2025-08-01")), Some(date("2025-08-03")));
        selection.clear();
        assert_eq!(selection, DateRangeSelection::default());
    }

    #[test]
    fn test_parse_date_accepts_iso_only() {
        assert_eq!(parse_date(" 2025-08-01 "), Some(date("2025-08-01")));
        assert_eq!(parse_date("08/01/2025"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }
}
