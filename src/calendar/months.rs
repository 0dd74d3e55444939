//! The rows x cols arrangement of displayed months.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::extent::HostLayoutMetrics;
use super::range::DateRange;
use super::{days_between, days_in_month0, first_weekday_of_month, normalize_month, weekday_index};
use crate::error::{GridError, GridResult};

/// Cells per month: six week rows of seven days.
pub const DAYS_PER_MONTH_GRID: u32 = 42;

/// First displayed month. `month0` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthAnchor {
    pub year:   i32,
    pub month0: u32,
}

impl MonthAnchor {
    pub fn new(year: i32, month0: i64) -> Self {
        let (year, month0) = normalize_month(year, month0);
        Self { year, month0 }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month0: date.month0() }
    }

    pub fn shifted(&self, months: i64) -> Self {
        Self::new(self.year, self.month0 as i64 + months)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// Months from this anchor to the month containing `date`.
    pub fn months_to(&self, date: NaiveDate) -> i64 {
        (date.year() as i64 - self.year as i64) * 12 + date.month0() as i64 - self.month0 as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInfo {
    pub year:   i32,
    pub month0: u32,
    /// Leading cells before day 1 as drawn. The first displayed month uses 7
    /// instead of 0 so a full week of the previous month stays visible.
    pub first_day_offset: u32,
    /// Weekday distance of day 1 from the week-start day (0-6).
    pub weekday_offset: u32,
    pub days_in_month:      u32,
    pub days_in_prev_month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    pub anchor:         MonthAnchor,
    pub rows:           u32,
    pub cols:           u32,
    pub week_start_day: u32,
}

impl MonthLayout {
    pub fn new(anchor: MonthAnchor, rows: u32, cols: u32, week_start_day: u32) -> GridResult<Self> {
        if week_start_day > 6 {
            return Err(GridError::InvalidWeekStart(week_start_day));
        }
        Ok(Self { anchor, rows, cols, week_start_day })
    }

    pub fn from_metrics(anchor: MonthAnchor, metrics: &HostLayoutMetrics) -> GridResult<Self> {
        Self::new(anchor, metrics.month_rows, metrics.month_cols, metrics.week_start_day)
    }

    pub fn month_count(&self) -> u32 {
        self.rows * self.cols
    }

    pub fn with_anchor(&self, anchor: MonthAnchor) -> Self {
        Self { anchor, ..*self }
    }

    pub fn month_at(&self, months_offset: i64) -> MonthAnchor {
        self.anchor.shifted(months_offset)
    }

    pub fn months_offset(&self, date: NaiveDate) -> i64 {
        self.anchor.months_to(date)
    }

    pub fn contains_month(&self, date: NaiveDate) -> bool {
        let offset = self.months_offset(date);
        offset >= 0 && offset < self.month_count() as i64
    }

    pub fn month_info(&self, row: u32, col: u32) -> Option<MonthInfo> {
        let m = self.anchor.shifted(row as i64 * self.cols as i64 + col as i64);
        let prev = m.shifted(-1);
        let first_weekday = first_weekday_of_month(m.year, m.month0)?;
        let weekday_offset = days_between(self.week_start_day, first_weekday);
        let first_day_offset = if row == 0 && col == 0 && weekday_offset == 0 { 7 } else { weekday_offset };

        Some(MonthInfo {
            year: m.year,
            month0: m.month0,
            first_day_offset,
            weekday_offset,
            days_in_month:      days_in_month0(m.year, m.month0),
            days_in_prev_month: days_in_month0(prev.year, prev.month0),
        })
    }

    /// Every day drawn by the layout, including the greyed days of the
    /// months before and after. `None` when no month is shown.
    pub fn visible_range(&self) -> Option<DateRange> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }

        let first = self.month_info(0, 0)?;
        let prev  = self.anchor.shifted(-1);
        let start_day = first.days_in_prev_month + 1 - first.first_day_offset;
        let start = NaiveDate::from_ymd_opt(prev.year, prev.month0 + 1, start_day)?;

        let last = self.month_info(self.rows - 1, self.cols - 1)?;
        let next = self.anchor.shifted(self.month_count() as i64);
        let end_day = DAYS_PER_MONTH_GRID - last.first_day_offset - last.days_in_month;
        let end = NaiveDate::from_ymd_opt(next.year, next.month0 + 1, end_day)?;

        DateRange::new(start, end).ok()
    }

    /// Anchor that keeps `date` on screen while moving as little as possible.
    pub fn ensure_visible(&self, date: NaiveDate) -> MonthAnchor {
        let offset = self.months_offset(date);
        let count  = self.month_count().max(1) as i64;
        if offset < 0 {
            MonthAnchor::from_date(date)
        } else if offset >= count {
            self.anchor.shifted(offset - count + 1)
        } else {
            self.anchor
        }
    }

    /// Inclusive days from `start_day` of month `start_offset` to `end_day`
    /// of month `end_offset`, both relative to the anchor.
    pub fn inclusive_days(&self, start_offset: i64, start_day: u32, end_offset: i64, end_day: u32) -> i64 {
        let mut days = 0i64;
        for offset in start_offset..end_offset {
            let m = self.month_at(offset);
            days += days_in_month0(m.year, m.month0) as i64;
        }
        days + end_day as i64 - start_day as i64 + 1
    }

    /// `None` when the week would start before `NaiveDate::MIN`.
    pub fn week_start_of(&self, date: NaiveDate) -> Option<NaiveDate> {
        let back = days_between(self.week_start_day, weekday_index(date.weekday()));
        date.checked_sub_signed(Duration::days(back as i64))
    }

    /// `None` when the week would end after `NaiveDate::MAX`.
    pub fn week_end_of(&self, date: NaiveDate) -> Option<NaiveDate> {
        let last = (self.week_start_day + 6) % 7;
        let ahead = days_between(weekday_index(date.weekday()), last);
        date.checked_add_signed(Duration::days(ahead as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn layout(year: i32, month0: i64, rows: u32, cols: u32, week_start: u32) -> MonthLayout {
        MonthLayout::new(MonthAnchor::new(year, month0), rows, cols, week_start).unwrap()
    }

    #[test]
    fn test_rejects_bad_week_start() {
        let err = MonthLayout::new(MonthAnchor::new(2024, 0), 1, 1, 7).unwrap_err();
        assert_eq!(err, GridError::InvalidWeekStart(7));
    }

    #[test]
    fn test_anchor_normalizes() {
        assert_eq!(MonthAnchor::new(2024, -1), MonthAnchor { year: 2023, month0: 11 });
        assert_eq!(MonthAnchor::new(2024, 0).shifted(14), MonthAnchor { year: 2025, month0: 2 });
        assert_eq!(MonthAnchor::new(2024, 1).months_to(ymd(2023, 12, 25)), -2);
    }

    #[test]
    fn test_visible_range_sunday_start() {
        // 2024-01-01 is a Monday: one greyed day before, ten after
        let range = layout(2024, 0, 1, 1, 0).visible_range().unwrap();
        assert_eq!(range.start, ymd(2023, 12, 31));
        assert_eq!(range.end,   ymd(2024, 2, 10));
        assert_eq!(range.day_count(), 42);
    }

    #[test]
    fn test_visible_range_keeps_leading_week() {
        // Monday start and January begins on Monday: a full week is shown before it
        let l = layout(2024, 0, 1, 1, 1);
        assert_eq!(l.month_info(0, 0).unwrap().first_day_offset, 7);
        assert_eq!(l.month_info(0, 0).unwrap().weekday_offset, 0);
        let range = l.visible_range().unwrap();
        assert_eq!(range.start, ymd(2023, 12, 25));
        assert_eq!(range.end,   ymd(2024, 2, 4));
    }

    #[test]
    fn test_visible_range_multi_month() {
        // Jan..Jun 2024 in 2 rows x 3 cols; June 2024 starts on Saturday
        let l = layout(2024, 0, 2, 3, 0);
        let last = l.month_info(1, 2).unwrap();
        assert_eq!((last.year, last.month0), (2024, 5));
        assert_eq!(last.first_day_offset, 6);
        let range = l.visible_range().unwrap();
        assert_eq!(range.start, ymd(2023, 12, 31));
        assert_eq!(range.end,   ymd(2024, 7, 6));
    }

    #[test]
    fn test_visible_range_needs_months() {
        assert!(layout(2024, 0, 0, 3, 0).visible_range().is_none());
    }

    #[test]
    fn test_month_info_crosses_year() {
        let info = layout(2024, 10, 1, 3, 0).month_info(0, 2).unwrap();
        assert_eq!((info.year, info.month0), (2025, 0));
        assert_eq!(info.days_in_prev_month, 31);
    }

    #[test]
    fn test_ensure_visible() {
        let l = layout(2024, 0, 1, 3, 0);
        assert_eq!(l.ensure_visible(ymd(2024, 2, 10)), MonthAnchor::new(2024, 0));
        assert_eq!(l.ensure_visible(ymd(2024, 4, 1)), MonthAnchor::new(2024, 1));
        assert_eq!(l.ensure_visible(ymd(2023, 11, 30)), MonthAnchor::new(2023, 10));
        assert!(l.contains_month(ymd(2024, 3, 31)));
        assert!(!l.contains_month(ymd(2024, 4, 1)));
    }

    #[test]
    fn test_inclusive_days() {
        let l = layout(2024, 0, 1, 3, 0);
        // Jan 30 .. Feb 2
        assert_eq!(l.inclusive_days(0, 30, 1, 2), 4);
        // Jan 1 .. Mar 1 across the leap day
        assert_eq!(l.inclusive_days(0, 1, 2, 1), 61);
        assert_eq!(l.inclusive_days(1, 5, 1, 5), 1);
    }

    #[test]
    fn test_week_rounding() {
        let sunday_start = layout(2024, 0, 1, 1, 0);
        // 2024-01-10 is a Wednesday
        assert_eq!(sunday_start.week_start_of(ymd(2024, 1, 10)), Some(ymd(2024, 1, 7)));
        assert_eq!(sunday_start.week_end_of(ymd(2024, 1, 10)),   Some(ymd(2024, 1, 13)));

        let monday_start = layout(2024, 0, 1, 1, 1);
        assert_eq!(monday_start.week_start_of(ymd(2024, 1, 7)), Some(ymd(2024, 1, 1)));
        assert_eq!(monday_start.week_end_of(ymd(2024, 1, 7)),   Some(ymd(2024, 1, 7)));
    }

    #[test]
    fn test_week_rounding_at_calendar_limits() {
        for week_start in 0..7 {
            let l = layout(2024, 0, 1, 1, week_start);
            // a week running past either limit has no bound; one that fits does
            let min_back = days_between(week_start, weekday_index(NaiveDate::MIN.weekday()));
            assert_eq!(l.week_start_of(NaiveDate::MIN).is_some(), min_back == 0, "start {week_start}");
            assert!(l.week_end_of(NaiveDate::MIN).is_some());

            let last = (week_start + 6) % 7;
            let max_ahead = days_between(weekday_index(NaiveDate::MAX.weekday()), last);
            assert_eq!(l.week_end_of(NaiveDate::MAX).is_some(), max_ahead == 0, "start {week_start}");
            assert!(l.week_start_of(NaiveDate::MAX).is_some());
        }
    }
}
