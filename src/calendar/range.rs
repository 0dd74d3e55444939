//! Offset <-> date conversion over the displayed run of days.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// The contiguous span of days the widget currently renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> GridResult<Self> {
        if start > end {
            return Err(GridError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive number of days in the range.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `start + offset` days. Offsets past `end` are not rejected.
    pub fn date_for_offset(&self, offset: i64) -> Option<NaiveDate> {
        self.start.checked_add_signed(Duration::try_days(offset)?)
    }

    /// Days from `start` to `date`, negative before the range.
    pub fn offset_for_date(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> DateRange {
        DateRange::new(ymd(2024, 1, 1), ymd(2024, 2, 11)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, GridError::InvertedRange { .. }));
        assert!(DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_day_count() {
        assert_eq!(january().day_count(), 42);
    }

    #[test]
    fn test_offset_round_trip() {
        let r = january();
        for offset in 0..r.day_count() {
            let date = r.date_for_offset(offset).unwrap();
            assert_eq!(r.offset_for_date(date), offset);
        }
    }

    #[test]
    fn test_dates_increase_with_offset() {
        let r = january();
        let dates: Vec<_> = (0..r.day_count()).map(|o| r.date_for_offset(o).unwrap()).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates.last(), Some(&r.end));
    }

    #[test]
    fn test_leap_day_is_not_skipped() {
        let r = DateRange::new(ymd(2024, 2, 28), ymd(2024, 3, 31)).unwrap();
        assert_eq!(r.date_for_offset(1), Some(ymd(2024, 2, 29)));
        assert_eq!(r.date_for_offset(2), Some(ymd(2024, 3, 1)));

        let r = DateRange::new(ymd(2023, 2, 28), ymd(2023, 3, 31)).unwrap();
        assert_eq!(r.date_for_offset(1), Some(ymd(2023, 3, 1)));
    }

    #[test]
    fn test_offsets_outside_range_are_not_clamped() {
        let r = january();
        assert_eq!(r.offset_for_date(ymd(2023, 12, 31)), -1);
        assert_eq!(r.offset_for_date(ymd(2024, 2, 12)), 42);
        assert_eq!(r.date_for_offset(-1), Some(ymd(2023, 12, 31)));
        assert_eq!(r.date_for_offset(100), Some(ymd(2024, 4, 10)));
    }

    #[test]
    fn test_date_overflow_is_none() {
        assert_eq!(january().date_for_offset(i64::MAX), None);
    }
}
