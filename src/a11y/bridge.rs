//! Background Tokio task that turns grid notices into spoken announcements.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::calendar::table::cell_name;
use crate::calendar::{
    month_name, AccessibleSelection, AccessibleTable, GridSnapshot, HostLayoutMetrics, MonthAnchor,
    MonthLayout, SelectionRange,
};

// ─── Channel types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum GridNotice {
    /// The highlighted dates changed.
    SelectionChanged { anchor: MonthAnchor, selection: Option<SelectionRange> },
    /// The displayed months changed.
    ModelChanged { anchor: MonthAnchor },
    FocusChanged { anchor: MonthAnchor, date: NaiveDate },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    Focus(String),
    Selection(String),
    Model(String),
}

impl Announcement {
    pub fn text(&self) -> &str {
        match self {
            Announcement::Focus(s) | Announcement::Selection(s) | Announcement::Model(s) => s,
        }
    }
}

// ─── Bridge handle ────────────────────────────────────────────────────────────

pub struct A11yBridge {
    pub notice_tx:   mpsc::Sender<GridNotice>,
    pub announce_rx: Arc<Mutex<mpsc::Receiver<Announcement>>>,
}

impl A11yBridge {
    /// Spawn the bridge on the current runtime. `metrics` must match the
    /// layout the widget draws with.
    pub fn spawn(metrics: HostLayoutMetrics) -> Self {
        let (notice_tx,   mut notice_rx)   = mpsc::channel::<GridNotice>(32);
        let (announce_tx,     announce_rx) = mpsc::channel::<Announcement>(64);

        tokio::spawn(async move {
            loop {
                match notice_rx.recv().await {
                    Some(GridNotice::Shutdown) | None => break,
                    Some(notice) => {
                        let Some(announcement) = describe(&metrics, &notice) else { continue };
                        tracing::debug!(text = announcement.text(), "announce");
                        if announce_tx.send(announcement).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("Accessibility bridge stopped");
        });

        A11yBridge { notice_tx, announce_rx: Arc::new(Mutex::new(announce_rx)) }
    }

    pub async fn notify(&self, notice: GridNotice) {
        let _ = self.notice_tx.send(notice).await;
    }

    pub async fn shutdown(&self) {
        let _ = self.notice_tx.send(GridNotice::Shutdown).await;
    }
}

// ─── Announcement text ────────────────────────────────────────────────────────

pub fn describe(metrics: &HostLayoutMetrics, notice: &GridNotice) -> Option<Announcement> {
    match *notice {
        GridNotice::FocusChanged { anchor, date } => {
            let snap = GridSnapshot::new(metrics, anchor, None);
            let name = cell_name(date);
            let text = match snap.offset_for_date(date) {
                Some(index) if snap.shape().contains_index(index) => {
                    let row = snap.row_at_index(index)?;
                    let col = snap.column_at_index(index)?;
                    format!("{name}, row {}, column {}", row + 1, col + 1)
                }
                _ => name,
            };
            Some(Announcement::Focus(text))
        }

        GridNotice::SelectionChanged { selection: None, .. } => {
            Some(Announcement::Selection("Selection cleared".into()))
        }

        GridNotice::SelectionChanged { anchor, selection: Some(sel) } => {
            let snap  = GridSnapshot::new(metrics, anchor, Some(sel));
            let count = snap.selection_count();
            let text  = if count == 1 {
                format!("{} selected", cell_name(sel.start))
            } else {
                let weeks = snap.selected_rows().len();
                format!(
                    "{count} days selected, {} to {}, across {weeks} week{}",
                    sel.start.format("%B %-d"),
                    sel.end.format("%B %-d"),
                    if weeks == 1 { "" } else { "s" },
                )
            };
            Some(Announcement::Selection(text))
        }

        GridNotice::ModelChanged { anchor } => {
            let layout = MonthLayout::from_metrics(anchor, metrics).ok()?;
            let count  = layout.month_count();
            if count == 0 {
                return None;
            }
            let last = layout.month_at(count as i64 - 1);
            let text = if count == 1 {
                format!("Showing {} {}", month_name(anchor.month0), anchor.year)
            } else {
                format!(
                    "Showing {} {} to {} {}",
                    month_name(anchor.month0), anchor.year,
                    month_name(last.month0), last.year,
                )
            };
            Some(Announcement::Model(text))
        }

        GridNotice::Shutdown => None,
    }
}
