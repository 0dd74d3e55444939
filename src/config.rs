use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar::{HostLayoutMetrics, LayoutPadding, SelectionPolicy};
use crate::error::GridError;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub grid:   Option<GridConfig>,
    /// Pixel metrics reported by `cg query`.
    pub layout: Option<HostLayoutMetrics>,
    pub log:    Option<LogConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GridConfig {
    pub week_start_day:    Option<u32>,
    pub month_rows:        Option<u32>,
    pub month_cols:        Option<u32>,
    pub show_week_numbers: Option<bool>,
    /// 0 removes the limit.
    pub max_days_selected: Option<u32>,
    /// 0 never rounds a selection to whole weeks.
    pub days_to_start_week_selection: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: Option<String>,
}

/// Grid options after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSettings {
    pub week_start_day:    u32,
    pub month_rows:        u32,
    pub month_cols:        u32,
    pub show_week_numbers: bool,
    pub selection:         SelectionPolicy,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            week_start_day: 1, month_rows: 1, month_cols: 3, show_week_numbers: false,
            selection: SelectionPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn grid_settings(&self) -> Result<GridSettings> {
        let d = GridSettings::default();
        let g = self.grid.as_ref();
        let s = GridSettings {
            week_start_day:    g.and_then(|g| g.week_start_day).unwrap_or(d.week_start_day),
            month_rows:        g.and_then(|g| g.month_rows).unwrap_or(d.month_rows),
            month_cols:        g.and_then(|g| g.month_cols).unwrap_or(d.month_cols),
            show_week_numbers: g.and_then(|g| g.show_week_numbers).unwrap_or(d.show_week_numbers),
            selection: SelectionPolicy {
                max_days_selected: g.and_then(|g| g.max_days_selected)
                    .unwrap_or(d.selection.max_days_selected),
                days_to_start_week_selection: g.and_then(|g| g.days_to_start_week_selection)
                    .unwrap_or(d.selection.days_to_start_week_selection),
            },
        };
        if s.week_start_day > 6 {
            return Err(GridError::InvalidWeekStart(s.week_start_day).into());
        }
        if s.month_rows == 0 || s.month_cols == 0 {
            return Err(GridError::NoVisibleMonths { rows: s.month_rows, cols: s.month_cols }.into());
        }
        Ok(s)
    }

    pub fn selection_policy(&self) -> Result<SelectionPolicy> {
        Ok(self.grid_settings()?.selection)
    }

    /// Pixel metrics for one-shot queries, with the grid options applied.
    pub fn pixel_metrics(&self) -> Result<HostLayoutMetrics> {
        let s = self.grid_settings()?;
        let base = self.layout.clone().unwrap_or_default();
        Ok(HostLayoutMetrics {
            month_rows:        s.month_rows,
            month_cols:        s.month_cols,
            week_start_day:    s.week_start_day,
            show_week_numbers: s.show_week_numbers,
            ..base
        })
    }

    /// Metrics in terminal cells: one row per text line, three columns per day.
    pub fn terminal_metrics(&self) -> Result<HostLayoutMetrics> {
        let s = self.grid_settings()?;
        let week_numbers = if s.show_week_numbers { 3 } else { 0 };
        Ok(HostLayoutMetrics {
            origin_x: 0, origin_y: 0, x_offset: 0,
            x_thickness: 0, y_thickness: 0,
            font_ascent: 1, font_descent: 0,
            // lpad + week numbers + 7 days + gap
            month_width:  1 + week_numbers + 7 * 3 + 2,
            // name + letters + rule + 6 weeks + gap
            month_height: 3 + 6 + 1,
            cell_width: 3, cell_height: 1,
            month_lpad: 1, month_tpad: 0,
            month_rows: s.month_rows,
            month_cols: s.month_cols,
            week_start_day: s.week_start_day,
            show_week_numbers: s.show_week_numbers,
            week_number_digit_width: 1,
            padding: LayoutPadding::none(),
        })
    }

    /// Log directive, `info` unless configured.
    pub fn log_level(&self) -> &str {
        self.log.as_ref().and_then(|l| l.level.as_deref()).unwrap_or("info")
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("calgrid")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("calgrid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(cfg.grid.is_none());
        assert_eq!(cfg.grid_settings().unwrap(), GridSettings::default());
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_grid_section_overrides() {
        let f = write_config(
            "[grid]\nweek_start_day = 0\nmonth_rows = 2\nshow_week_numbers = true\n\n[log]\nlevel = \"debug\"\n",
        );
        let cfg = AppConfig::load_from(f.path()).unwrap();
        let s = cfg.grid_settings().unwrap();
        assert_eq!(s.week_start_day, 0);
        assert_eq!(s.month_rows, 2);
        assert_eq!(s.month_cols, 3);
        assert!(s.show_week_numbers);
        assert_eq!(s.selection, SelectionPolicy::default());
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn test_selection_limits() {
        let f = write_config("[grid]
max_days_selected = 14
days_to_start_week_selection = 9
");
        let cfg = AppConfig::load_from(f.path()).unwrap();
        let p = cfg.selection_policy().unwrap();
        assert_eq!(p.max_days_selected, 14);
        assert_eq!(p.days_to_start_week_selection, 9);

        let f = write_config("[grid]
max_days_selected = 0
");
        let p = AppConfig::load_from(f.path()).unwrap().selection_policy().unwrap();
        assert_eq!(p.max_days_selected, 0);
        assert_eq!(p.days_to_start_week_selection, 0);

        // negative values are not a count
        let f = write_config("[grid]
days_to_start_week_selection = -1
");
        assert!(AppConfig::load_from(f.path()).is_err());
    }

    #[test]
    fn test_rejects_bad_week_start() {
        let f = write_config("[grid]\nweek_start_day = 7\n");
        let cfg = AppConfig::load_from(f.path()).unwrap();
        let err = cfg.grid_settings().unwrap_err();
        assert_eq!(err.downcast_ref::<GridError>(), Some(&GridError::InvalidWeekStart(7)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let f = write_config("[grid]\nmonth_cols = 0\n");
        let cfg = AppConfig::load_from(f.path()).unwrap();
        assert!(cfg.terminal_metrics().is_err());
    }

    #[test]
    fn test_layout_section_is_partial() {
        let f = write_config("[layout]\ncell_width = 30\n\n[layout.padding]\nypad_above_cells = 4\n");
        let cfg = AppConfig::load_from(f.path()).unwrap();
        let m = cfg.pixel_metrics().unwrap();
        assert_eq!(m.cell_width, 30);
        assert_eq!(m.cell_height, HostLayoutMetrics::default().cell_height);
        assert_eq!(m.padding.ypad_above_cells, 4);
        assert_eq!(m.padding.ypad_below_month_name, 1);
        assert_eq!(m.month_cols, 3);
    }

    #[test]
    fn test_terminal_metrics_geometry() {
        let cfg = AppConfig::default();
        let m = cfg.terminal_metrics().unwrap();
        assert_eq!(m.header_height(), 1);
        assert_eq!(m.day_letters_y(), 1);
        assert_eq!(m.cells_offset(), (1, 3));
        assert_eq!(m.month_width, 24);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let f = write_config("[grid\n");
        let err = AppConfig::load_from(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
