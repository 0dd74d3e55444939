//! Offset <-> (row, column) mapping for the fixed-width day grid.

use serde::{Deserialize, Serialize};

use super::range::DateRange;

/// Days per grid row.
pub const COLUMNS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row:    i64,
    pub column: i64,
}

impl GridPosition {
    pub fn from_offset(offset: i64) -> Self {
        Self { row: offset / COLUMNS, column: offset % COLUMNS }
    }

    pub fn offset(&self) -> i64 {
        self.row * COLUMNS + self.column
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: i64,
    pub rows:    i64,
    day_count:   i64,
}

impl GridShape {
    pub fn new(day_count: i64) -> Self {
        let day_count = day_count.max(0);
        Self {
            columns: COLUMNS,
            rows: (day_count + COLUMNS - 1) / COLUMNS,
            day_count,
        }
    }

    pub fn for_range(range: &DateRange) -> Self {
        Self::new(range.day_count())
    }

    pub fn day_count(&self) -> i64 {
        self.day_count
    }

    /// `row * columns + column`, with no bounds check on either input.
    pub fn index_at(&self, row: i64, column: i64) -> i64 {
        row * self.columns + column
    }

    /// Like [`index_at`](Self::index_at) but `None` outside the grid.
    pub fn checked_index_at(&self, row: i64, column: i64) -> Option<i64> {
        if (0..self.rows).contains(&row) && (0..self.columns).contains(&column) {
            Some(self.index_at(row, column))
        } else {
            None
        }
    }

    pub fn contains_index(&self, offset: i64) -> bool {
        (0..self.day_count).contains(&offset)
    }

    pub fn row_at_index(&self, offset: i64) -> Option<i64> {
        self.contains_index(offset).then(|| offset / self.columns)
    }

    pub fn column_at_index(&self, offset: i64) -> Option<i64> {
        self.contains_index(offset).then(|| offset % self.columns)
    }

    pub fn position_at_index(&self, offset: i64) -> Option<GridPosition> {
        self.contains_index(offset).then(|| GridPosition::from_offset(offset))
    }

    /// First and last offset of `row`.
    pub fn row_bounds(&self, row: i64) -> (i64, i64) {
        let first = row * self.columns;
        (first, first + self.columns - 1)
    }
}

/// Uniform cell size; every cell of a grid has the same extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSize {
    pub width:  i32,
    pub height: i32,
}

impl CellSize {
    pub fn column_extent_at(&self, _row: i64, _column: i64) -> i32 {
        self.width
    }

    pub fn row_extent_at(&self, _row: i64, _column: i64) -> i32 {
        self.height
    }
}
