//! Table, selection and component views of the day grid, in the shape an
//! accessibility bridge queries them.

use chrono::NaiveDate;

use super::extent::{day_extents, hit_test, CellExtent, HitTarget, HostLayoutMetrics};
use super::grid::{CellSize, GridShape, COLUMNS};
use super::months::{MonthAnchor, MonthLayout};
use super::range::DateRange;
use super::selection::{self, SelectionRange};
use super::weekday_name;

pub trait AccessibleTable {
    fn n_rows(&self) -> i64;
    fn n_columns(&self) -> i64;
    fn index_at(&self, row: i64, column: i64) -> Option<i64>;
    fn row_at_index(&self, index: i64) -> Option<i64>;
    fn column_at_index(&self, index: i64) -> Option<i64>;
    fn ref_at(&self, row: i64, column: i64) -> Option<NaiveDate>;
    fn column_extent_at(&self, row: i64, column: i64) -> i32;
    fn row_extent_at(&self, row: i64, column: i64) -> i32;
    fn is_selected(&self, row: i64, column: i64) -> bool;
    fn is_row_selected(&self, row: i64) -> bool;
    fn is_column_selected(&self, column: i64) -> bool;
    fn selected_rows(&self) -> Vec<i64>;
    fn selected_columns(&self) -> Vec<i64>;
    fn row_description(&self, row: i64) -> Option<String>;
    fn column_description(&self, column: i64) -> Option<&'static str>;
}

/// Selection requests return the selection the widget should apply; the
/// snapshot itself never changes.
pub trait AccessibleSelection {
    fn selection_count(&self) -> i64;
    fn is_child_selected(&self, index: i64) -> bool;
    fn ref_selection(&self, i: i64) -> Option<i64>;
    fn add_selection(&self, index: i64) -> Option<SelectionRange>;
    fn add_row_selection(&self, row: i64) -> Option<SelectionRange>;
    fn add_column_selection(&self, _column: i64) -> Option<SelectionRange> {
        None
    }
    fn remove_column_selection(&self, _column: i64) -> bool {
        false
    }
    /// True when there was a selection to clear.
    fn clear_selection(&self) -> bool;
}

pub trait AccessibleComponent {
    fn extents(&self, index: i64) -> Option<CellExtent>;
    fn index_at_point(&self, x: i32, y: i32) -> Option<i64>;
}

/// Read-only view of the widget at one instant.
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshot<'a> {
    /// `None` until the host has laid out at least one month.
    pub range:     Option<DateRange>,
    pub selection: Option<SelectionRange>,
    pub anchor:    MonthAnchor,
    pub metrics:   &'a HostLayoutMetrics,
}

impl<'a> GridSnapshot<'a> {
    /// Snapshot whose range is everything the month layout draws.
    pub fn new(metrics: &'a HostLayoutMetrics, anchor: MonthAnchor, selection: Option<SelectionRange>) -> Self {
        let range = MonthLayout::from_metrics(anchor, metrics)
            .ok()
            .and_then(|layout| layout.visible_range());
        Self { range, selection, anchor, metrics }
    }

    pub fn with_range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    pub fn shape(&self) -> GridShape {
        self.range.as_ref().map(GridShape::for_range).unwrap_or_else(|| GridShape::new(0))
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize { width: self.metrics.cell_width, height: self.metrics.cell_height }
    }

    pub fn n_children(&self) -> i64 {
        self.shape().day_count()
    }

    pub fn date_for_offset(&self, offset: i64) -> Option<NaiveDate> {
        self.range?.date_for_offset(offset)
    }

    pub fn offset_for_date(&self, date: NaiveDate) -> Option<i64> {
        self.range.map(|r| r.offset_for_date(date))
    }

    /// Date of child `index`, `None` outside the grid.
    pub fn ref_child(&self, index: i64) -> Option<NaiveDate> {
        if !self.shape().contains_index(index) {
            return None;
        }
        self.date_for_offset(index)
    }

    fn resolved(&self) -> Option<(DateRange, SelectionRange)> {
        Some((self.range?, self.selection?))
    }
}

impl AccessibleTable for GridSnapshot<'_> {
    fn n_rows(&self) -> i64 {
        self.shape().rows
    }

    fn n_columns(&self) -> i64 {
        COLUMNS
    }

    fn index_at(&self, row: i64, column: i64) -> Option<i64> {
        self.range.map(|_| self.shape().index_at(row, column))
    }

    fn row_at_index(&self, index: i64) -> Option<i64> {
        self.shape().row_at_index(index)
    }

    fn column_at_index(&self, index: i64) -> Option<i64> {
        self.shape().column_at_index(index)
    }

    fn ref_at(&self, row: i64, column: i64) -> Option<NaiveDate> {
        let index = self.shape().checked_index_at(row, column)?;
        self.ref_child(index)
    }

    fn column_extent_at(&self, row: i64, column: i64) -> i32 {
        self.cell_size().column_extent_at(row, column)
    }

    fn row_extent_at(&self, row: i64, column: i64) -> i32 {
        self.cell_size().row_extent_at(row, column)
    }

    fn is_selected(&self, row: i64, column: i64) -> bool {
        self.resolved()
            .map(|(r, s)| selection::is_selected(&r, &s, row, column))
            .unwrap_or(false)
    }

    fn is_row_selected(&self, row: i64) -> bool {
        self.resolved()
            .map(|(r, s)| selection::is_row_selected(&r, &s, row))
            .unwrap_or(false)
    }

    fn is_column_selected(&self, column: i64) -> bool {
        self.resolved()
            .map(|(r, s)| selection::is_column_selected(&r, &s, column))
            .unwrap_or(false)
    }

    fn selected_rows(&self) -> Vec<i64> {
        self.resolved()
            .map(|(r, s)| selection::selected_rows(&r, &s))
            .unwrap_or_default()
    }

    fn selected_columns(&self) -> Vec<i64> {
        Vec::new()
    }

    fn row_description(&self, row: i64) -> Option<String> {
        (0..self.n_rows()).contains(&row).then(|| format!("Week {}", row + 1))
    }

    fn column_description(&self, column: i64) -> Option<&'static str> {
        if !(0..COLUMNS).contains(&column) {
            return None;
        }
        Some(weekday_name(self.metrics.week_start_day + column as u32))
    }
}

impl AccessibleSelection for GridSnapshot<'_> {
    fn selection_count(&self) -> i64 {
        self.resolved()
            .map(|(r, s)| selection::selection_count(&r, &s))
            .unwrap_or(0)
    }

    fn is_child_selected(&self, index: i64) -> bool {
        self.resolved()
            .map(|(r, s)| selection::is_index_selected(&r, &s, index))
            .unwrap_or(false)
    }

    fn ref_selection(&self, i: i64) -> Option<i64> {
        let (r, s) = self.resolved()?;
        selection::ref_selection(&r, &s, i)
    }

    fn add_selection(&self, index: i64) -> Option<SelectionRange> {
        SelectionRange::at_index(self.range.as_ref()?, index)
    }

    fn add_row_selection(&self, row: i64) -> Option<SelectionRange> {
        if !(0..self.n_rows()).contains(&row) {
            return None;
        }
        SelectionRange::for_row(self.range.as_ref()?, row)
    }

    fn clear_selection(&self) -> bool {
        self.selection.is_some()
    }
}

impl AccessibleComponent for GridSnapshot<'_> {
    fn extents(&self, index: i64) -> Option<CellExtent> {
        let date = self.ref_child(index)?;
        day_extents(self.anchor, date, self.metrics)
    }

    fn index_at_point(&self, x: i32, y: i32) -> Option<i64> {
        match hit_test(self.anchor, self.metrics, x, y)? {
            HitTarget::Day(date) => {
                let index = self.offset_for_date(date)?;
                self.shape().contains_index(index).then_some(index)
            }
            HitTarget::MonthHeader(_) | HitTarget::WeekNumber(_) => None,
        }
    }
}

/// Spoken label of a day cell.
pub fn cell_name(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
