mod app;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::App;
use calgrid::a11y::A11yBridge;
use calgrid::calendar::MonthAnchor;
use calgrid::config::{self, AppConfig};
use calgrid::query::{parse_anchor, parse_date, QueryReport};
use calgrid::theme::ThemeConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // ── cg query <date> ───────────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("query") {
        return cmd_query(&args[2..]);
    }

    // ── cg (TUI) ──────────────────────────────────────────────────────────────
    run_tui().await
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(cfg: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level()))
}

// ─── Query command ────────────────────────────────────────────────────────────

fn cmd_query(args: &[String]) -> Result<()> {
    let cfg = AppConfig::load()?;
    // Logging to stderr so it doesn't interfere with the report
    tracing_subscriber::registry()
        .with(env_filter(&cfg))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut date   = None;
    let mut anchor = None;
    let mut json   = false;
    let mut it = args.iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--json"   => json = true,
            "--anchor" => {
                let v = it.next().ok_or_else(|| anyhow!("--anchor needs a YYYY-MM value"))?;
                anchor = Some(parse_anchor(v)?);
            }
            other if date.is_none() => date = Some(parse_date(other)?),
            other => return Err(anyhow!("unexpected argument: {other}")),
        }
    }
    let date    = date.ok_or_else(|| anyhow!("usage: cg query <YYYY-MM-DD> [--anchor YYYY-MM] [--json]"))?;
    let anchor  = anchor.unwrap_or_else(|| MonthAnchor::from_date(date));
    let metrics = cfg.pixel_metrics()?;

    let report = QueryReport::build(anchor, date, &metrics)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

async fn run_tui() -> Result<()> {
    let cfg = AppConfig::load()?;

    let log_dir = config::data_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "calgrid.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(env_filter(&cfg))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting calgrid");

    let mut metrics = cfg.terminal_metrics()?;
    metrics.origin_x = ui::GRID_ORIGIN.0;
    metrics.origin_y = ui::GRID_ORIGIN.1;
    let theme  = ThemeConfig::load()?;
    let bridge = A11yBridge::spawn(metrics.clone());

    let mut app = App::new(metrics, theme, app::today())?.with_policy(cfg.selection_policy()?);
    app.attach_bridge(bridge);
    app.run().await?;

    tracing::info!("calgrid exited");
    Ok(())
}
