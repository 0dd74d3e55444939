//! Containment queries against the highlighted dates.
//!
//! Selection endpoints are converted to offsets relative to the displayed
//! range and compared as-is. They are never re-sorted, so a selection whose
//! start comes after its end contains no cell.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::grid::{GridShape, COLUMNS};
use super::months::MonthLayout;
use super::range::DateRange;

/// Limits applied while a selection is being extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Longest selection in days; 0 leaves it unbounded.
    pub max_days_selected: u32,
    /// Selections spanning at least this many days grow to whole weeks; 0
    /// never rounds. Rounding is off while `max_days_selected` is below 7.
    pub days_to_start_week_selection: u32,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self { max_days_selected: 42, days_to_start_week_selection: 0 }
    }
}

impl SelectionPolicy {
    fn rounds_to_weeks(&self) -> bool {
        self.max_days_selected == 0 || self.max_days_selected >= 7
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl SelectionRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Selection spanning `a` and `b` in calendar order.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b { Self::new(a, b) } else { Self::new(b, a) }
    }

    /// Selection between the fixed end `from` and the moving end `to` under
    /// `policy`. `from_full_week` marks an extension that began on a week
    /// number, whose later end always reaches the end of its week. When the
    /// day limit bites, the moving end gives way.
    pub fn limited(
        layout: &MonthLayout,
        policy: &SelectionPolicy,
        from: NaiveDate,
        to: NaiveDate,
        from_full_week: bool,
    ) -> Option<Self> {
        let dragging_end = to >= from;
        let (mut start, mut end) = if dragging_end { (from, to) } else { (to, from) };

        if policy.rounds_to_weeks() {
            let days = layout.inclusive_days(
                layout.months_offset(start), start.day(),
                layout.months_offset(end),   end.day(),
            );
            let threshold = policy.days_to_start_week_selection as i64;
            let whole_weeks = threshold > 0 && days >= threshold;
            if whole_weeks {
                start = layout.week_start_of(start)?;
            }
            if whole_weeks || from_full_week {
                end = layout.week_end_of(end)?;
            }
        }

        if policy.max_days_selected > 0 {
            let span = Duration::days(policy.max_days_selected as i64 - 1);
            if dragging_end {
                if let Some(max_end) = start.checked_add_signed(span) {
                    end = end.min(max_end);
                }
            } else if let Some(min_start) = end.checked_sub_signed(span) {
                start = start.max(min_start);
            }
        }
        Some(Self::new(start, end))
    }

    /// `(start, end)` offsets relative to `range.start`.
    pub fn offsets(&self, range: &DateRange) -> (i64, i64) {
        (range.offset_for_date(self.start), range.offset_for_date(self.end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Single-day selection at `offset`, or `None` outside the range.
    pub fn at_index(range: &DateRange, offset: i64) -> Option<Self> {
        if !GridShape::for_range(range).contains_index(offset) {
            return None;
        }
        range.date_for_offset(offset).map(Self::single)
    }

    /// Whole-week selection covering `row`.
    pub fn for_row(range: &DateRange, row: i64) -> Option<Self> {
        let (first, last) = GridShape::for_range(range).row_bounds(row);
        Some(Self::new(range.date_for_offset(first)?, range.date_for_offset(last)?))
    }
}

pub fn is_index_selected(range: &DateRange, selection: &SelectionRange, offset: i64) -> bool {
    let (start, end) = selection.offsets(range);
    start <= offset && offset <= end
}

pub fn is_selected(range: &DateRange, selection: &SelectionRange, row: i64, column: i64) -> bool {
    is_index_selected(range, selection, row * COLUMNS + column)
}

/// True when the selection starts before the row and reaches into it, or
/// starts inside it.
pub fn is_row_selected(range: &DateRange, selection: &SelectionRange, row: i64) -> bool {
    let (start, end) = selection.offsets(range);
    let row_first = row * COLUMNS;
    let row_last  = row_first + COLUMNS - 1;

    (start < row_first && end >= row_first) || (start >= row_first && start <= row_last)
}

/// Only whole days and rows can be selected.
pub fn is_column_selected(_range: &DateRange, _selection: &SelectionRange, _column: i64) -> bool {
    false
}

/// Inclusive selected day count. Not clamped to the displayed range.
pub fn selection_count(range: &DateRange, selection: &SelectionRange) -> i64 {
    let (start, end) = selection.offsets(range);
    end - start + 1
}

pub fn selected_rows(range: &DateRange, selection: &SelectionRange) -> Vec<i64> {
    let shape = GridShape::for_range(range);
    (0..shape.rows).filter(|&row| is_row_selected(range, selection, row)).collect()
}

/// Grid index of the `i`-th selected cell.
pub fn ref_selection(range: &DateRange, selection: &SelectionRange, i: i64) -> Option<i64> {
    if i < 0 || i >= selection_count(range, selection) {
        return None;
    }
    let (start, _) = selection.offsets(range);
    Some(start + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::months::MonthAnchor;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(ymd(2024, 1, 1), ymd(2024, 2, 11)).unwrap()
    }

    fn monday_layout() -> MonthLayout {
        MonthLayout::new(MonthAnchor::new(2024, 4), 1, 3, 1).unwrap()
    }

    fn policy(max: u32, weeks_after: u32) -> SelectionPolicy {
        SelectionPolicy { max_days_selected: max, days_to_start_week_selection: weeks_after }
    }

    #[test]
    fn test_limited_clamps_the_moving_end() {
        let l = monday_layout();
        // dragging forward: the end stops max - 1 days after the start
        let sel = SelectionRange::limited(&l, &policy(5, 0), ymd(2024, 5, 29), ymd(2024, 6, 12), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 29), ymd(2024, 6, 2))));
        // dragging backward: the start gives way instead
        let sel = SelectionRange::limited(&l, &policy(5, 0), ymd(2024, 6, 2), ymd(2024, 5, 20), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 29), ymd(2024, 6, 2))));
        // no limit
        let sel = SelectionRange::limited(&l, &policy(0, 0), ymd(2024, 5, 1), ymd(2024, 7, 31), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 1), ymd(2024, 7, 31))));
    }

    #[test]
    fn test_limited_snaps_to_weeks() {
        let l = monday_layout();
        // Wed May 15 .. Thu May 23 is 9 days: Monday May 13 .. Sunday May 26
        let sel = SelectionRange::limited(&l, &policy(42, 9), ymd(2024, 5, 15), ymd(2024, 5, 23), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 13), ymd(2024, 5, 26))));
        // one day short of the threshold stays as dragged
        let sel = SelectionRange::limited(&l, &policy(42, 9), ymd(2024, 5, 15), ymd(2024, 5, 22), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 15), ymd(2024, 5, 22))));
        // across a month boundary, backwards
        let sel = SelectionRange::limited(&l, &policy(42, 9), ymd(2024, 6, 5), ymd(2024, 5, 24), false);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 20), ymd(2024, 6, 9))));
    }

    #[test]
    fn test_limited_week_rounding_needs_a_week_of_room() {
        let l = monday_layout();
        let sel = SelectionRange::limited(&l, &policy(6, 2), ymd(2024, 5, 15), ymd(2024, 5, 17), true);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 15), ymd(2024, 5, 17))));
    }

    #[test]
    fn test_limited_from_week_number_rounds_up_the_end() {
        let l = monday_layout();
        // drag that began on the week of Monday May 13 and reached Tuesday May 21
        let sel = SelectionRange::limited(&l, &policy(42, 0), ymd(2024, 5, 13), ymd(2024, 5, 21), true);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 13), ymd(2024, 5, 26))));
        // then clamped by the day limit
        let sel = SelectionRange::limited(&l, &policy(10, 0), ymd(2024, 5, 13), ymd(2024, 5, 21), true);
        assert_eq!(sel, Some(SelectionRange::new(ymd(2024, 5, 13), ymd(2024, 5, 22))));
    }

    #[test]
    fn test_limited_at_calendar_limits() {
        let l = monday_layout();
        let max = NaiveDate::MAX;
        // no week end to round to near the last representable day
        let rounded = SelectionRange::limited(&l, &policy(0, 1), max, max, false);
        assert_eq!(rounded.is_none(), l.week_end_of(max).is_none());
        // the day limit never overflows
        let sel = SelectionRange::limited(&l, &policy(5, 0), max, max, false);
        assert_eq!(sel, Some(SelectionRange::single(max)));
    }

    #[test]
    fn test_is_selected_boundaries() {
        let r   = range();
        let sel = SelectionRange::new(ymd(2024, 1, 5), ymd(2024, 1, 10));
        for offset in 4..=9 {
            assert!(is_selected(&r, &sel, offset / 7, offset % 7), "offset {offset}");
        }
        assert!(!is_selected(&r, &sel, 0, 3));
        assert!(!is_selected(&r, &sel, 1, 3)); // offset 10
    }

    #[test]
    fn test_row_selection_on_both_sides_of_boundary() {
        let r   = range();
        // offsets 5..9
        let sel = SelectionRange::new(ymd(2024, 1, 6), ymd(2024, 1, 10));
        assert!(is_row_selected(&r, &sel, 0));
        assert!(is_row_selected(&r, &sel, 1));
        assert!(!is_row_selected(&r, &sel, 2));
        assert_eq!(selected_rows(&r, &sel), vec![0, 1]);
    }

    #[test]
    fn test_row_selection_edges() {
        let r = range();
        // ends exactly on the first day of row 1
        let sel = SelectionRange::new(ymd(2024, 1, 3), ymd(2024, 1, 8));
        assert!(is_row_selected(&r, &sel, 1));
        // ends on the last day of row 0
        let sel = SelectionRange::new(ymd(2024, 1, 3), ymd(2024, 1, 7));
        assert!(!is_row_selected(&r, &sel, 1));
        // spans a whole row and beyond
        let sel = SelectionRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31));
        assert!(is_row_selected(&r, &sel, 3));
        assert!(!is_row_selected(&r, &sel, 5));
    }

    #[test]
    fn test_reversed_selection_is_not_normalized() {
        let r   = range();
        let sel = SelectionRange::new(ymd(2024, 1, 10), ymd(2024, 1, 5));
        for offset in 0..r.day_count() {
            assert!(!is_index_selected(&r, &sel, offset));
        }
        assert_eq!(selection_count(&r, &sel), -4);
        // the start still lies inside row 1
        assert!(is_row_selected(&r, &sel, 1));
        assert!(!is_row_selected(&r, &sel, 0));
    }

    #[test]
    fn test_selection_count_is_unclamped() {
        let r   = range();
        let sel = SelectionRange::new(ymd(2023, 12, 1), ymd(2024, 3, 1));
        assert_eq!(selection_count(&r, &sel), 92);
        assert!(selection_count(&r, &sel) > r.day_count());
    }

    #[test]
    fn test_columns_are_never_selected() {
        let r   = range();
        let sel = SelectionRange::new(ymd(2024, 1, 1), ymd(2024, 2, 11));
        for col in 0..7 {
            assert!(!is_column_selected(&r, &sel, col));
        }
    }

    #[test]
    fn test_ref_selection() {
        let r   = range();
        let sel = SelectionRange::new(ymd(2024, 1, 5), ymd(2024, 1, 7));
        assert_eq!(ref_selection(&r, &sel, 0), Some(4));
        assert_eq!(ref_selection(&r, &sel, 2), Some(6));
        assert_eq!(ref_selection(&r, &sel, 3), None);
        assert_eq!(ref_selection(&r, &sel, -1), None);
    }

    #[test]
    fn test_selection_constructors() {
        let r = range();
        assert_eq!(SelectionRange::at_index(&r, 3), Some(SelectionRange::single(ymd(2024, 1, 4))));
        assert_eq!(SelectionRange::at_index(&r, 42), None);
        assert_eq!(
            SelectionRange::for_row(&r, 1),
            Some(SelectionRange::new(ymd(2024, 1, 8), ymd(2024, 1, 14)))
        );
        assert_eq!(
            SelectionRange::spanning(ymd(2024, 1, 9), ymd(2024, 1, 2)),
            SelectionRange::new(ymd(2024, 1, 2), ymd(2024, 1, 9))
        );
    }
}
