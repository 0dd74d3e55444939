//! One-shot coordinate report for `cg query`.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::calendar::table::cell_name;
use crate::calendar::{
    day_extents, AccessibleSelection, AccessibleTable, CellExtent, DateRange, GridSnapshot,
    HostLayoutMetrics, MonthAnchor, MonthLayout, SelectionRange,
};
use crate::error::{GridError, GridResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryReport {
    pub date:   NaiveDate,
    pub name:   String,
    pub anchor: MonthAnchor,
    pub range:  Option<DateRange>,
    /// Raw offset from the first displayed day; may fall outside the grid.
    pub offset: Option<i64>,
    pub index:  Option<i64>,
    pub row:    Option<i64>,
    pub column: Option<i64>,
    /// The date's week row, as selected by a row selection.
    pub week:          Option<SelectionRange>,
    pub week_selected: bool,
    pub week_days:     i64,
    pub extent:        Option<CellExtent>,
}

impl QueryReport {
    pub fn build(anchor: MonthAnchor, date: NaiveDate, metrics: &HostLayoutMetrics) -> GridResult<Self> {
        let layout = MonthLayout::from_metrics(anchor, metrics)?;
        if layout.month_count() == 0 {
            return Err(GridError::NoVisibleMonths { rows: layout.rows, cols: layout.cols });
        }

        let snap   = GridSnapshot::new(metrics, anchor, None);
        let offset = snap.offset_for_date(date);
        let index  = offset.filter(|&i| snap.shape().contains_index(i));
        let pos    = index.and_then(|i| snap.shape().position_at_index(i));
        let row    = pos.map(|p| p.row);
        let column = pos.map(|p| p.column);
        let week   = row.and_then(|r| snap.add_row_selection(r));

        let selected = GridSnapshot { selection: week, ..snap };
        tracing::debug!(%date, ?offset, ?row, ?column, "query");

        Ok(Self {
            date,
            name: cell_name(date),
            anchor,
            range: snap.range,
            offset,
            index,
            row,
            column,
            week,
            week_selected: row.map(|r| selected.is_row_selected(r)).unwrap_or(false),
            week_days:     selected.selection_count(),
            extent:        day_extents(anchor, date, metrics),
        })
    }
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        match self.range {
            Some(r) => writeln!(f, "  visible   {} .. {} ({} days)", r.start, r.end, r.day_count())?,
            None    => writeln!(f, "  visible   -")?,
        }
        match (self.offset, self.index) {
            (Some(o), Some(_)) => writeln!(f, "  offset    {o}")?,
            (Some(o), None)    => writeln!(f, "  offset    {o} (outside grid)")?,
            _                  => writeln!(f, "  offset    -")?,
        }
        match (self.row, self.column) {
            (Some(r), Some(c)) => writeln!(f, "  position  row {r}, column {c}")?,
            _                  => writeln!(f, "  position  -")?,
        }
        match self.week {
            Some(w) => writeln!(
                f, "  week      {} .. {} ({} days, row selected: {})",
                w.start, w.end, self.week_days, self.week_selected,
            )?,
            None => writeln!(f, "  week      -")?,
        }
        match self.extent {
            Some(e) => write!(f, "  extent    x={} y={} {}x{}", e.x, e.y, e.width, e.height),
            None    => write!(f, "  extent    -"),
        }
    }
}

pub fn parse_date(s: &str) -> GridResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GridError::InvalidDate(s.to_owned()))
}

/// Parses `YYYY-MM` into the anchor showing that month first.
pub fn parse_anchor(s: &str) -> GridResult<MonthAnchor> {
    let bad = || GridError::InvalidDate(s.to_owned());
    let (y, m) = s.split_once('-').ok_or_else(bad)?;
    let year:  i32 = y.parse().map_err(|_| bad())?;
    let month: u32 = m.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) {
        return Err(bad());
    }
    Ok(MonthAnchor::new(year, month as i64 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_for_displayed_day() {
        let m = HostLayoutMetrics::default();
        let r = QueryReport::build(MonthAnchor::new(2024, 0), ymd(2024, 1, 10), &m).unwrap();
        assert_eq!(r.range.unwrap().start, ymd(2023, 12, 31));
        assert_eq!(r.offset, Some(10));
        assert_eq!((r.row, r.column), (Some(1), Some(3)));
        assert_eq!(r.week, Some(SelectionRange::new(ymd(2024, 1, 7), ymd(2024, 1, 13))));
        assert!(r.week_selected);
        assert_eq!(r.week_days, 7);
        assert_eq!(r.extent, Some(CellExtent { x: 75, y: 53, width: 24, height: 18 }));
    }

    #[test]
    fn test_report_outside_grid() {
        let m = HostLayoutMetrics::default();
        let r = QueryReport::build(MonthAnchor::new(2024, 0), ymd(2024, 3, 5), &m).unwrap();
        assert!(r.offset.unwrap() > 41);
        assert_eq!(r.index, None);
        assert_eq!(r.row, None);
        assert_eq!(r.week, None);
        assert!(!r.week_selected);
        assert_eq!(r.week_days, 0);
        assert_eq!(r.extent, None);
        assert!(r.to_string().contains("(outside grid)"));
    }

    #[test]
    fn test_report_rejects_empty_layout() {
        let m = HostLayoutMetrics { month_cols: 0, ..Default::default() };
        let err = QueryReport::build(MonthAnchor::new(2024, 0), ymd(2024, 1, 1), &m).unwrap_err();
        assert_eq!(err, GridError::NoVisibleMonths { rows: 1, cols: 0 });
    }

    #[test]
    fn test_report_serializes() {
        let m = HostLayoutMetrics::default();
        let r = QueryReport::build(MonthAnchor::new(2024, 0), ymd(2024, 1, 10), &m).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["date"], "2024-01-10");
        assert_eq!(v["row"], 1);
        assert_eq!(v["extent"]["x"], 75);
        assert_eq!(v["anchor"]["month0"], 0);
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), Err(GridError::InvalidDate("2023-02-29".into())));
        assert_eq!(parse_anchor("2024-05").unwrap(), MonthAnchor::new(2024, 4));
        assert!(parse_anchor("2024-13").is_err());
        assert!(parse_anchor("2024").is_err());
    }
}
