//! Day grid addressing for multi-month calendars.
//!
//! Three coordinate spaces meet here: linear day offsets from the first
//! displayed day, `(row, column)` positions in a 7-column grid, and calendar
//! dates. Everything is a pure function of the snapshots passed in; the
//! owning widget keeps the state.

pub mod extent;
pub mod grid;
pub mod months;
pub mod range;
pub mod selection;
pub mod table;

pub use extent::{
    cell_extent, date_at_cell, day_extents, hit_test, leading_cells, CellExtent, HitTarget, HostLayoutMetrics,
    LayoutPadding,
};
pub use grid::{CellSize, GridPosition, GridShape, COLUMNS};
pub use months::{MonthAnchor, MonthInfo, MonthLayout};
pub use range::DateRange;
pub use selection::{SelectionPolicy, SelectionRange};
pub use table::{AccessibleComponent, AccessibleSelection, AccessibleTable, GridSnapshot};

use chrono::{Datelike, NaiveDate, Weekday};

/// Number of days in `month` (1-12) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else { return 0 };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(n) => (n - first).num_days() as u32,
        None    => 31, // December of the last representable year
    }
}

/// Same as [`days_in_month`] with a 0-based month.
pub fn days_in_month0(year: i32, month0: u32) -> u32 {
    days_in_month(year, month0 + 1)
}

/// Fold a month index outside 0..12 into the year, e.g. `(2024, -1)` is
/// December 2023 and `(2024, 13)` is February 2025.
pub fn normalize_month(year: i32, month0: i64) -> (i32, u32) {
    let y = year as i64 + month0.div_euclid(12);
    (y as i32, month0.rem_euclid(12) as u32)
}

pub fn first_of_month(year: i32, month0: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(w: Weekday) -> u32 {
    w.num_days_from_sunday()
}

pub fn weekday_from_index(i: u32) -> Option<Weekday> {
    match i {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Days counted forward from weekday `from` to weekday `to` (both 0-6).
pub fn days_between(from: u32, to: u32) -> u32 {
    (to % 7 + 7 - from % 7) % 7
}

/// Weekday index (0 = Sunday) of the 1st of the month.
pub fn first_weekday_of_month(year: i32, month0: u32) -> Option<u32> {
    first_of_month(year, month0).map(|d| weekday_index(d.weekday()))
}

pub fn weekday_name(i: u32) -> &'static str {
    match i % 7 {
        0 => "Sunday",   1 => "Monday", 2 => "Tuesday", 3 => "Wednesday",
        4 => "Thursday", 5 => "Friday", _ => "Saturday",
    }
}

pub fn weekday_letters(i: u32) -> &'static str {
    match i % 7 {
        0 => "Su", 1 => "Mo", 2 => "Tu", 3 => "We", 4 => "Th", 5 => "Fr", _ => "Sa",
    }
}

pub fn month_name(month0: u32) -> &'static str {
    match month0 {
        0=>"January", 1=>"February", 2=>"March",     3=>"April",
        4=>"May",     5=>"June",     6=>"July",      7=>"August",
        8=>"September",9=>"October", 10=>"November", 11=>"December",
        _=>"???",
    }
}
