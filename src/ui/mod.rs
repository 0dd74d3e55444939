use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use calgrid::calendar::table::cell_name;
use calgrid::calendar::{
    cell_extent, date_at_cell, month_name, weekday_letters, AccessibleComponent, AccessibleSelection, AccessibleTable, GridSnapshot,
};

use crate::app::App;

/// Top-left of the calendar's inner area; the metrics origin must match.
pub const GRID_ORIGIN: (i32, i32) = (1, 1);

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Fill background
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg()).fg(app.theme.fg())),
        area,
    );

    // Layout: [ content | status_bar(1) ]
    let root = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)]).split(area);

    // Content: [ calendar | inspector ]
    let m     = &app.metrics;
    let cal_w = (m.month_cols as i32 * m.month_width + 2).clamp(0, u16::MAX as i32) as u16;
    let cal_h = (m.month_rows as i32 * m.month_height + 2).clamp(0, u16::MAX as i32) as u16;
    let cols  = Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Length(cal_w), Constraint::Min(0)]).split(root[0]);
    let left  = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Length(cal_h), Constraint::Min(0)]).split(cols[0]);

    let snap = app.snapshot();
    draw_calendar(f, app, &snap, left[0]);
    draw_inspector(f, app, &snap, cols[1]);
    draw_statusbar(f, app, root[1]);

    if app.show_help {
        draw_help(f, area, app);
    }
}

// ─── Calendar ─────────────────────────────────────────────────────────────────

fn draw_calendar(f: &mut Frame, app: &App, snap: &GridSnapshot<'_>, area: Rect) {
    let t      = &app.theme;
    let anchor = app.anchor();
    let last   = app.layout.month_at(app.layout.month_count() as i64 - 1);
    let title  = if app.layout.month_count() > 1 {
        format!(" {} {} – {} {} ", month_name(anchor.month0), anchor.year, month_name(last.month0), last.year)
    } else {
        format!(" {} {} ", month_name(anchor.month0), anchor.year)
    };

    let block = Block::default()
        .title(Title::from(Line::from(Span::styled(
            title,
            Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
        ))))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border_active()))
        .style(Style::default().bg(t.bg()));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let buf = f.buffer_mut();
    for months_offset in 0..app.layout.month_count() as i64 {
        draw_month(buf, inner, app, snap, months_offset);
    }
}

fn draw_month(buf: &mut Buffer, clip: Rect, app: &App, snap: &GridSnapshot<'_>, months_offset: i64) {
    let t      = &app.theme;
    let m      = &app.metrics;
    let anchor = app.anchor();
    let month  = anchor.shifted(months_offset);
    let Some(first) = month.first_day() else { return };

    let (mx, my)  = m.month_origin(months_offset);
    let (cdx, _)  = m.cells_offset();
    let cells_x   = mx + cdx;
    let grid_w    = 7 * m.cell_width;

    // Month name
    let name = format!("{} {}", month_name(month.month0), month.year);
    let nx   = cells_x + (grid_w - name.chars().count() as i32).max(0) / 2;
    put(buf, clip, nx, my, &name, Style::default().fg(t.accent()).add_modifier(Modifier::BOLD));

    // Day letters and rule
    let ly = my + m.day_letters_y();
    for c in 0..7 {
        let wd    = (m.week_start_day + c) % 7;
        let color = if wd == 0 || wd == 6 { t.weekend_color() } else { t.fg_dim() };
        put(buf, clip, cells_x + c as i32 * m.cell_width, ly, weekday_letters(wd),
            Style::default().fg(color).add_modifier(Modifier::BOLD));
    }
    put(buf, clip, cells_x, ly + 1, &"─".repeat(grid_w.max(0) as usize), Style::default().fg(t.border()));

    let is_first  = months_offset == 0;
    let is_last   = months_offset == app.layout.month_count() as i64 - 1;
    let per_month = 6 * 7;

    for k in 0..per_month {
        let Some(date) = date_at_cell(anchor, m, months_offset, k) else { continue };
        let cell = cell_extent(m, months_offset, k);

        if m.show_week_numbers && k % 7 == 0 {
            let wx = mx + m.month_lpad;
            put(buf, clip, wx, cell.y,
                &format!("{:>2}", date.iso_week().week()), Style::default().fg(t.week_number()));
        }

        let inside = date.month0() == month.month0 && date.year() == month.year;
        // greyed days only lead the first month and trail the last one
        if !inside && !((date < first && is_first) || (date > first && is_last)) {
            continue;
        }

        let style = day_style(app, snap, date, inside);
        put(buf, clip, cell.x, cell.y, &format!("{:>2}", date.day()), style);
    }
}

fn day_style(app: &App, snap: &GridSnapshot<'_>, date: NaiveDate, inside: bool) -> Style {
    let t        = &app.theme;
    let selected = snap.offset_for_date(date)
        .map(|i| snap.is_child_selected(i))
        .unwrap_or(false);
    let weekend  = matches!(date.weekday().num_days_from_sunday(), 0 | 6);

    if date == app.cursor {
        let (bg, fg) = t.cursor_highlight();
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    } else if selected {
        let (bg, fg) = t.range_highlight();
        Style::default().bg(bg).fg(fg)
    } else if date == app.today {
        let (bg, fg) = t.today_highlight();
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    } else if !inside {
        Style::default().fg(t.outside_color())
    } else if weekend {
        Style::default().fg(t.weekend_color())
    } else {
        Style::default().fg(t.fg())
    }
}

/// Writes `s` at `(x, y)` when it fits inside `clip`.
fn put(buf: &mut Buffer, clip: Rect, x: i32, y: i32, s: &str, style: Style) {
    let w = s.chars().count() as i32;
    if x < clip.x as i32 || y < clip.y as i32
        || x + w > clip.right() as i32 || y >= clip.bottom() as i32
    {
        return;
    }
    buf.set_string(x as u16, y as u16, s, style);
}

// ─── Inspector panel ──────────────────────────────────────────────────────────

fn draw_inspector(f: &mut Frame, app: &App, snap: &GridSnapshot<'_>, area: Rect) {
    let t     = &app.theme;
    let block = Block::default()
        .title(Title::from(Line::from(Span::styled(" ◆ Cell ", Style::default().fg(t.accent())))))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border()))
        .style(Style::default().bg(t.bg()));

    let key = Style::default().fg(t.fg_dim());
    let val = Style::default().fg(t.fg());
    let hdr = Style::default().fg(t.accent()).add_modifier(Modifier::BOLD);
    let row_of = |label: &str, value: String| Line::from(vec![
        Span::styled(format!("  {label:<10}"), key),
        Span::styled(value, val),
    ]);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", cell_name(app.cursor)), hdr)),
    ];

    let index = snap.offset_for_date(app.cursor).filter(|&i| snap.shape().contains_index(i));
    match index {
        Some(i) => {
            let r = snap.row_at_index(i).unwrap_or(0);
            let c = snap.column_at_index(i).unwrap_or(0);
            lines.push(row_of("Offset", i.to_string()));
            lines.push(row_of("Position", format!(
                "row {r}, column {c}  ({}, {})",
                snap.row_description(r).unwrap_or_default(),
                snap.column_description(c).unwrap_or("-"),
            )));
            lines.push(row_of("Extent", match snap.extents(i) {
                Some(e) => format!("x={} y={} {}x{}", e.x, e.y, e.width, e.height),
                None    => "not drawn".into(),
            }));
            lines.push(row_of("Cell", format!("{} x {}", snap.column_extent_at(r, c), snap.row_extent_at(r, c))));
            lines.push(row_of("Week sel.", if snap.is_row_selected(r) { "yes".into() } else { "no".into() }));
        }
        None => lines.push(row_of("Offset", "outside grid".into())),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Grid", hdr)));
    lines.push(row_of("Shape", format!("{} x {}, {} days", snap.n_rows(), snap.n_columns(), snap.n_children())));
    if let Some(r) = snap.range {
        lines.push(row_of("Range", format!("{} .. {}", r.start, r.end)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Selection", hdr)));
    match app.selection {
        Some(s) => {
            lines.push(row_of("Dates", format!("{} .. {}", s.start, s.end)));
            lines.push(row_of("Days", snap.selection_count().to_string()));
            lines.push(row_of("Rows", format!("{:?}", snap.selected_rows())));
            if let Some(first) = snap.ref_selection(0).and_then(|i| snap.ref_child(i)) {
                lines.push(row_of("First", first.to_string()));
            }
        }
        None => lines.push(row_of("Dates", "none".into())),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Announced", hdr)));
    for a in app.announcements.iter().rev() {
        lines.push(Line::from(Span::styled(format!("  {a}"), key.add_modifier(Modifier::ITALIC))));
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" GRID ", Style::default().bg(t.accent()).fg(t.bg()).add_modifier(Modifier::BOLD)),
        Span::styled(
            "  hjkl:move  HJKL:extend  [:prev  ]:next  t:today  w:week  c:clear  T:theme  ?:help  q:quit",
            Style::default().fg(t.fg_dim()),
        ),
        Span::styled(
            format!("  {}", app.theme.name),
            Style::default().fg(t.fg_dim()).add_modifier(Modifier::ITALIC),
        ),
    ])).style(Style::default().bg(t.popup_bg()));
    f.render_widget(bar, area);
}

// ─── Help overlay ────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let t    = &app.theme;
    let rect = centered(60, 70, area);
    f.render_widget(Clear, rect);

    let title = Line::from(Span::styled(
        " Keyboard & Mouse ",
        Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border_active()))
        .style(Style::default().bg(t.popup_bg()));

    let accent = Style::default().fg(t.accent()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(t.fg_dim());
    let lines  = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", accent)),
        Line::from(Span::styled("  h/j/k/l  ←↓↑→     Move by day / week", dim)),
        Line::from(Span::styled("  [ / ]   scroll     Prev / Next month", dim)),
        Line::from(Span::styled("  t                  Jump to today", dim)),
        Line::from(""),
        Line::from(Span::styled("  Selection", accent)),
        Line::from(Span::styled("  H/J/K/L  Shift+←↓↑→ Extend selection", dim)),
        Line::from(Span::styled("  click / drag       Select day / range", dim)),
        Line::from(Span::styled("  w  or week number  Select the whole week", dim)),
        Line::from(Span::styled("  c / Esc            Clear selection", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  T                  Cycle theme", dim)),
        Line::from(Span::styled("  ?                  Help (any key closes)", dim)),
        Line::from(Span::styled("  q                  Quit", dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().fg(t.fg()))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}
