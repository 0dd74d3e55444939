use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use calgrid::{
    a11y::{A11yBridge, Announcement, GridNotice},
    calendar::{
        days_in_month0, hit_test, AccessibleSelection, AccessibleTable, GridSnapshot, HitTarget,
        HostLayoutMetrics, MonthAnchor, MonthLayout, SelectionPolicy, SelectionRange,
    },
    theme::ThemeConfig,
};

use crate::ui::draw;

/// Announcements kept for the inspector panel.
const ANNOUNCE_BACKLOG: usize = 6;

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    pub theme:         ThemeConfig,
    pub metrics:       HostLayoutMetrics,
    pub layout:        MonthLayout,
    pub cursor:        NaiveDate,
    /// Fixed end of a selection being extended with Shift or a drag.
    pub extend_from:   Option<NaiveDate>,
    /// The extension began on a week number.
    pub from_full_week: bool,
    pub policy:        SelectionPolicy,
    pub selection:     Option<SelectionRange>,
    pub today:         NaiveDate,
    pub bridge:        Option<A11yBridge>,
    pub outbox:        Vec<GridNotice>,
    pub announcements: Vec<String>,
    pub show_help:     bool,
    pub running:       bool,
}

impl App {
    /// `metrics` are in terminal cells with the origin at the top-left of
    /// the calendar's inner area.
    pub fn new(metrics: HostLayoutMetrics, theme: ThemeConfig, today: NaiveDate) -> Result<Self> {
        let layout = MonthLayout::from_metrics(MonthAnchor::from_date(today), &metrics)?;
        let anchor = layout.anchor;
        let selection = Some(SelectionRange::single(today));
        Ok(Self {
            theme, metrics, layout,
            cursor: today,
            extend_from: None,
            from_full_week: false,
            policy: SelectionPolicy::default(),
            selection,
            today,
            bridge: None,
            outbox: vec![
                GridNotice::ModelChanged { anchor },
                GridNotice::FocusChanged { anchor, date: today },
            ],
            announcements: Vec::new(),
            show_help: false,
            running: true,
        })
    }

    pub fn attach_bridge(&mut self, b: A11yBridge) { self.bridge = Some(b); }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn anchor(&self) -> MonthAnchor { self.layout.anchor }

    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot::new(&self.metrics, self.layout.anchor, self.selection)
    }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term).await;

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        term.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick = std::time::Duration::from_millis(50);
        while self.running {
            self.flush_notices().await;
            term.draw(|f| draw(f, self))?;

            let pending: Vec<Announcement> = if let Some(ref b) = self.bridge {
                if let Ok(mut rx) = b.announce_rx.try_lock() {
                    let mut buf = Vec::new();
                    while let Ok(a) = rx.try_recv() { buf.push(a); }
                    buf
                } else { vec![] }
            } else { vec![] };
            for a in pending { self.on_announcement(a); }

            if event::poll(tick)? {
                match event::read()? {
                    Event::Key(key)     => self.on_key(key),
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    _ => {}
                }
            }
        }

        if let Some(ref b) = self.bridge { b.shutdown().await; }
        Ok(())
    }

    async fn flush_notices(&mut self) {
        let notices = std::mem::take(&mut self.outbox);
        if let Some(ref b) = self.bridge {
            for n in notices { b.notify(n).await; }
        }
    }

    pub fn on_announcement(&mut self, a: Announcement) {
        self.announcements.push(a.text().to_owned());
        if self.announcements.len() > ANNOUNCE_BACKLOG {
            let excess = self.announcements.len() - ANNOUNCE_BACKLOG;
            self.announcements.drain(..excess);
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,

            KeyCode::Right | KeyCode::Char('l') => self.move_by(1, shift),
            KeyCode::Left  | KeyCode::Char('h') => self.move_by(-1, shift),
            KeyCode::Down  | KeyCode::Char('j') => self.move_by(7, shift),
            KeyCode::Up    | KeyCode::Char('k') => self.move_by(-7, shift),
            KeyCode::Char('L') => self.move_by(1, true),
            KeyCode::Char('H') => self.move_by(-1, true),
            KeyCode::Char('J') => self.move_by(7, true),
            KeyCode::Char('K') => self.move_by(-7, true),

            KeyCode::Char(']') => self.move_months(1),
            KeyCode::Char('[') => self.move_months(-1),
            KeyCode::Char('t') => self.focus(self.today, false),

            KeyCode::Char('w') => self.select_week(),
            KeyCode::Char('c') | KeyCode::Esc => self.clear_selection(),

            // T (Shift+T) cycles themes
            KeyCode::Char('T') => {
                self.theme = self.theme.next();
                if let Err(e) = self.theme.save() {
                    tracing::warn!("saving theme failed: {e:#}");
                }
            }
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, ev: MouseEvent) {
        let extend = ev.modifiers.contains(KeyModifiers::SHIFT);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left)  => self.click(ev.column, ev.row, extend),
            MouseEventKind::Drag(MouseButton::Left)  => self.click(ev.column, ev.row, true),
            MouseEventKind::ScrollDown               => self.move_months(1),
            MouseEventKind::ScrollUp                 => self.move_months(-1),
            _ => {}
        }
    }

    pub fn click(&mut self, column: u16, row: u16, extend: bool) {
        let target = hit_test(self.layout.anchor, &self.metrics, column as i32, row as i32);
        tracing::trace!(column, row, ?target, "click");
        match target {
            Some(HitTarget::Day(date)) => {
                if extend || self.cursor != date || self.extend_from.is_some() {
                    self.focus(date, extend);
                }
            }
            Some(HitTarget::WeekNumber(date)) if extend && self.extend_from.is_some() => {
                self.focus(date, true);
            }
            Some(HitTarget::WeekNumber(date)) => {
                self.focus(date, false);
                self.select_week();
                // a drag from here keeps whole weeks
                if let Some(sel) = self.selection {
                    self.extend_from    = Some(sel.start);
                    self.from_full_week = true;
                }
            }
            Some(HitTarget::MonthHeader(month)) => {
                if let Some(first) = month.first_day() {
                    self.focus(first, false);
                }
            }
            None => {}
        }
    }

    // ── Grid state ────────────────────────────────────────────────────────────

    fn set_anchor(&mut self, anchor: MonthAnchor) {
        if anchor == self.layout.anchor {
            return;
        }
        tracing::debug!(year = anchor.year, month0 = anchor.month0, "anchor moved");
        self.layout = self.layout.with_anchor(anchor);
        self.outbox.push(GridNotice::ModelChanged { anchor });
    }

    /// Moves the cursor to `date`, scrolling it into view. With `extend`
    /// the selection runs from the extension anchor to `date`, limited by
    /// the selection policy.
    pub fn focus(&mut self, date: NaiveDate, extend: bool) {
        let from = self.extend_from.unwrap_or(self.cursor);
        self.cursor = date;
        if !self.layout.contains_month(date) {
            self.set_anchor(self.layout.ensure_visible(date));
        }

        if extend {
            let limited = SelectionRange::limited(&self.layout, &self.policy, from, date, self.from_full_week);
            self.extend_from = Some(from);
            self.selection   = Some(limited.unwrap_or_else(|| SelectionRange::spanning(from, date)));
        } else {
            self.extend_from    = None;
            self.from_full_week = false;
            self.selection      = Some(SelectionRange::single(date));
        }

        let anchor = self.layout.anchor;
        self.outbox.push(GridNotice::FocusChanged { anchor, date });
        self.outbox.push(GridNotice::SelectionChanged { anchor, selection: self.selection });
    }

    pub fn move_by(&mut self, days: i64, extend: bool) {
        let Some(date) = self.cursor.checked_add_signed(Duration::days(days)) else { return };
        self.focus(date, extend);
    }

    /// Scrolls whole months, keeping the cursor's day where the month allows.
    pub fn move_months(&mut self, months: i64) {
        let target = MonthAnchor::from_date(self.cursor).shifted(months);
        let day    = self.cursor.day().min(days_in_month0(target.year, target.month0));
        let Some(date) = NaiveDate::from_ymd_opt(target.year, target.month0 + 1, day) else { return };
        self.set_anchor(self.layout.anchor.shifted(months));
        self.focus(date, false);
    }

    /// Selects the week row holding the cursor.
    pub fn select_week(&mut self) {
        let snap = self.snapshot();
        let Some(index) = snap.offset_for_date(self.cursor) else { return };
        let Some(row)   = snap.row_at_index(index) else { return };
        let Some(sel)   = snap.add_row_selection(row) else { return };

        self.extend_from    = None;
        self.from_full_week = false;
        self.selection      = Some(sel);
        self.outbox.push(GridNotice::SelectionChanged {
            anchor: self.layout.anchor, selection: self.selection,
        });
    }

    pub fn clear_selection(&mut self) {
        if !self.snapshot().clear_selection() {
            return;
        }
        self.extend_from    = None;
        self.from_full_week = false;
        self.selection      = None;
        self.outbox.push(GridNotice::SelectionChanged { anchor: self.layout.anchor, selection: None });
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
