//! Pixel rectangles of day cells inside a multi-month calendar.
//!
//! All measurements come from [`HostLayoutMetrics`]; font ascent and descent
//! are inputs, so the same date always lands on the same rectangle for the
//! same metrics.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::months::{MonthAnchor, MonthLayout};
use super::{days_in_month0, first_of_month, first_weekday_of_month};

/// Week rows drawn per month.
pub const ROWS_PER_MONTH: i32 = 6;
/// Day columns drawn per month.
pub const COLS_PER_MONTH: i32 = 7;

/// Fixed spacing around the month name, the day letters and the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPadding {
    pub ypad_above_month_name:   i32,
    pub ypad_below_month_name:   i32,
    pub ypad_above_day_letters:  i32,
    pub ypad_below_day_letters:  i32,
    pub ypad_above_cells:        i32,
    pub xpad_before_week_numbers: i32,
    pub xpad_after_week_numbers:  i32,
    pub xpad_before_cells:        i32,
}

impl Default for LayoutPadding {
    fn default() -> Self {
        Self {
            ypad_above_month_name:    1,
            ypad_below_month_name:    1,
            ypad_above_day_letters:   0,
            ypad_below_day_letters:   0,
            ypad_above_cells:         1,
            xpad_before_week_numbers: 1,
            xpad_after_week_numbers:  2,
            xpad_before_cells:        1,
        }
    }
}

impl LayoutPadding {
    /// No spacing at all; used by hosts whose unit is a text cell.
    pub fn none() -> Self {
        Self {
            ypad_above_month_name:    0,
            ypad_below_month_name:    0,
            ypad_above_day_letters:   0,
            ypad_below_day_letters:   0,
            ypad_above_cells:         0,
            xpad_before_week_numbers: 0,
            xpad_after_week_numbers:  0,
            xpad_before_cells:        0,
        }
    }
}

/// Geometry the host widget hands to the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostLayoutMetrics {
    pub origin_x:  i32,
    pub origin_y:  i32,
    pub x_offset:  i32,
    pub x_thickness: i32,
    pub y_thickness: i32,
    pub font_ascent:  i32,
    pub font_descent: i32,
    pub month_width:  i32,
    pub month_height: i32,
    pub cell_width:   i32,
    pub cell_height:  i32,
    pub month_lpad: i32,
    pub month_tpad: i32,
    pub month_rows: u32,
    pub month_cols: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub week_start_day: u32,
    pub show_week_numbers: bool,
    pub week_number_digit_width: i32,
    pub padding: LayoutPadding,
}

impl Default for HostLayoutMetrics {
    fn default() -> Self {
        Self {
            origin_x: 0, origin_y: 0, x_offset: 0,
            x_thickness: 1, y_thickness: 1,
            font_ascent: 11, font_descent: 3,
            month_width: 174, month_height: 160,
            cell_width: 24, cell_height: 18,
            month_lpad: 0, month_tpad: 0,
            month_rows: 1, month_cols: 1,
            week_start_day: 0,
            show_week_numbers: false,
            week_number_digit_width: 7,
            padding: LayoutPadding::default(),
        }
    }
}

impl HostLayoutMetrics {
    pub fn char_height(&self) -> i32 {
        self.font_ascent + self.font_descent
    }

    pub fn month_count(&self) -> i64 {
        self.month_rows as i64 * self.month_cols as i64
    }

    /// Height of the month name band, measured from the month's top edge.
    pub fn header_height(&self) -> i32 {
        let p = &self.padding;
        self.y_thickness * 2 + p.ypad_above_month_name + self.char_height() + p.ypad_below_month_name
    }

    /// Top-left corner of month `months_offset`.
    pub fn month_origin(&self, months_offset: i64) -> (i32, i32) {
        let cols = self.month_cols.max(1) as i64;
        let month_row = (months_offset / cols) as i32;
        let month_col = (months_offset % cols) as i32;
        (
            self.origin_x + self.x_thickness + self.x_offset + month_col * self.month_width,
            self.origin_y + self.y_thickness + month_row * self.month_height,
        )
    }

    fn week_numbers_x(&self) -> i32 {
        self.padding.xpad_before_week_numbers + self.month_lpad
    }

    fn week_numbers_width(&self) -> i32 {
        self.week_number_digit_width * 2
    }

    /// Top-left of the day-cell grid relative to its month's corner.
    pub fn cells_offset(&self) -> (i32, i32) {
        let p = &self.padding;
        let mut x = self.week_numbers_x();
        if self.show_week_numbers {
            x += self.week_numbers_width() + p.xpad_after_week_numbers + 1;
        }
        x += p.xpad_before_cells;

        let text_y = self.header_height() + p.ypad_above_day_letters + self.month_tpad;
        let y = text_y + self.char_height() + p.ypad_below_day_letters + 1 + p.ypad_above_cells;
        (x, y)
    }

    /// Row of the day letters relative to its month's corner.
    pub fn day_letters_y(&self) -> i32 {
        self.header_height() + self.padding.ypad_above_day_letters + self.month_tpad
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellExtent {
    pub x:      i32,
    pub y:      i32,
    pub width:  i32,
    pub height: i32,
}

impl CellExtent {
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Rectangle of `date`'s cell, or `None` when its month is not displayed.
pub fn day_extents(anchor: MonthAnchor, date: NaiveDate, metrics: &HostLayoutMetrics) -> Option<CellExtent> {
    let months_offset = anchor.months_to(date);
    if months_offset < 0 || months_offset > metrics.month_count() {
        return None;
    }

    let (month_x, month_y) = metrics.month_origin(months_offset);
    let (cells_dx, cells_dy) = metrics.cells_offset();

    let first_weekday = first_weekday_of_month(date.year(), date.month0())?;
    let days_from_week_start = (first_weekday + 7 - metrics.week_start_day % 7) % 7;

    let cell    = (date.day() + days_from_week_start - 1) as i32;
    let day_row = cell / 7;
    let day_col = cell % 7;

    Some(CellExtent {
        x:      month_x + cells_dx + day_col * metrics.cell_width,
        y:      month_y + cells_dy + day_row * metrics.cell_height,
        width:  metrics.cell_width,
        height: metrics.cell_height,
    })
}

/// Leading cells drawn before day 1 of month `months_offset`. The first
/// displayed month keeps a whole week of its predecessor when it starts on
/// the week-start day, so this can be 7 where [`day_extents`] counts 0.
pub fn leading_cells(anchor: MonthAnchor, metrics: &HostLayoutMetrics, months_offset: i64) -> Option<i64> {
    if months_offset < 0 {
        return None;
    }
    let cols = metrics.month_cols.max(1) as i64;
    let row = u32::try_from(months_offset / cols).ok()?;
    let col = (months_offset % cols) as u32;
    let info = MonthLayout::from_metrics(anchor, metrics).ok()?.month_info(row, col)?;
    Some(info.first_day_offset as i64)
}

/// Rectangle of cell `cell` (0..42, row-major) of month `months_offset`.
pub fn cell_extent(metrics: &HostLayoutMetrics, months_offset: i64, cell: i32) -> CellExtent {
    let (month_x, month_y) = metrics.month_origin(months_offset);
    let (cells_dx, cells_dy) = metrics.cells_offset();
    CellExtent {
        x:      month_x + cells_dx + (cell % COLS_PER_MONTH) * metrics.cell_width,
        y:      month_y + cells_dy + (cell / COLS_PER_MONTH) * metrics.cell_height,
        width:  metrics.cell_width,
        height: metrics.cell_height,
    }
}

/// Date drawn in cell `cell` of month `months_offset`, greyed days included.
pub fn date_at_cell(anchor: MonthAnchor, metrics: &HostLayoutMetrics, months_offset: i64, cell: i32) -> Option<NaiveDate> {
    let month = anchor.shifted(months_offset);
    let first = first_of_month(month.year, month.month0)?;
    let lead  = leading_cells(anchor, metrics, months_offset)?;
    first.checked_add_signed(Duration::try_days(cell as i64 - lead)?)
}

/// What lies under a point of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    MonthHeader(MonthAnchor),
    Day(NaiveDate),
    /// Week-number cell; carries the first day drawn on that row.
    WeekNumber(NaiveDate),
}

/// Inverse of [`cell_extent`] and [`date_at_cell`]: what the host drew at a
/// point. Blank cells before the first month and after the last one resolve
/// to the neighbouring month's days; other blanks miss.
pub fn hit_test(anchor: MonthAnchor, metrics: &HostLayoutMetrics, px: i32, py: i32) -> Option<HitTarget> {
    if metrics.month_width <= 0 || metrics.month_height <= 0
        || metrics.cell_width <= 0 || metrics.cell_height <= 0
    {
        return None;
    }

    let x = px - metrics.origin_x - metrics.x_thickness - metrics.x_offset;
    let y = py - metrics.origin_y - metrics.y_thickness;
    if x < 0 || y < 0 {
        return None;
    }

    let row = y / metrics.month_height;
    let col = x / metrics.month_width;
    if row as u32 >= metrics.month_rows || col as u32 >= metrics.month_cols {
        return None;
    }
    let months_offset = row as i64 * metrics.month_cols as i64 + col as i64;
    let month = anchor.shifted(months_offset);

    let lx = x % metrics.month_width;
    let ly = y % metrics.month_height;
    if ly < metrics.header_height() {
        return Some(HitTarget::MonthHeader(month));
    }

    let (cells_dx, cells_dy) = metrics.cells_offset();
    let ly = ly - cells_dy;
    if ly < 0 {
        return None;
    }
    let day_row = ly / metrics.cell_height;
    if day_row >= ROWS_PER_MONTH {
        return None;
    }

    let wk_x1 = metrics.week_numbers_x();
    let entire_week = metrics.show_week_numbers
        && lx >= wk_x1 && lx < wk_x1 + metrics.week_numbers_width();

    let day_col = if entire_week {
        0
    } else {
        let lx = lx - cells_dx;
        if lx < 0 {
            return None;
        }
        let c = lx / metrics.cell_width;
        if c >= COLS_PER_MONTH {
            return None;
        }
        c
    };

    let first = first_of_month(month.year, month.month0)?;
    let lead = leading_cells(anchor, metrics, months_offset)?;
    let from_first = (day_row * COLS_PER_MONTH + day_col) as i64 - lead;
    let date = first.checked_add_signed(Duration::days(from_first))?;

    if entire_week {
        return Some(HitTarget::WeekNumber(date));
    }

    let dim = days_in_month0(month.year, month.month0) as i64;
    let last_offset = metrics.month_count() - 1;
    if from_first < 0 && months_offset != 0 {
        return None;
    }
    if from_first >= dim && months_offset != last_offset {
        return None;
    }
    Some(HitTarget::Day(date))
}
