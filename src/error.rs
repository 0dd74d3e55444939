use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building grid inputs. Query misses are `None`, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("date range starts on {start} but ends on {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("week start day {0} is out of range (expected 0=Sunday .. 6=Saturday)")]
    InvalidWeekStart(u32),

    #[error("layout shows no months ({rows} x {cols})")]
    NoVisibleMonths { rows: u32, cols: u32 },

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::InvalidWeekStart(9);
        assert_eq!(
            err.to_string(),
            "week start day 9 is out of range (expected 0=Sunday .. 6=Saturday)"
        );
    }

    #[test]
    fn test_inverted_range_display() {
        let err = GridError::InvertedRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            end:   NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(err.to_string().contains("2024-03-02"));
    }
}
