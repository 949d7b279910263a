/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use period_countdown::config::{School, SchoolManager, UserOverlay};
use period_countdown::resolver::DEFAULT_HORIZON_DAYS;

// ── CLI argument definition ───────────────────────────────────────────────────

/// What to show after the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NextUp {
    Disabled,
    /// The next class, even if it is days away.
    One,
    /// Every remaining period of today.
    All,
}

/// Period countdown for a school bell schedule.
///
/// Example:
///   period-countdown --school configs/sample_school.yaml \
///                    --user me.yaml --next-up all --watch
#[derive(Debug, Parser)]
#[command(
    name = "period-countdown",
    about = "Shows the current school period and how long until it ends",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML school definition.
    #[arg(short = 's', long = "school")]
    school: PathBuf,

    /// Path to the YAML user file (class names, teachers, rooms).
    #[arg(short = 'u', long = "user")]
    user: Option<PathBuf>,

    /// School-local time to resolve instead of now, e.g. `2021-09-01T08:52`.
    #[arg(short = 'a', long = "at", value_parser = parse_local_datetime)]
    at: Option<NaiveDateTime>,

    /// Refresh once per second until Ctrl-C.  SIGHUP reloads the school file.
    #[arg(short = 'w', long = "watch", default_value_t = false, conflicts_with = "at")]
    watch: bool,

    /// What to list after the current period.
    #[arg(short = 'n', long = "next-up", value_enum, default_value_t = NextUp::One)]
    next_up: NextUp,
}

fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("'{s}' is not a local date-time (expected YYYY-MM-DDTHH:MM[:SS])"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        school  = %cli.school.display(),
        user    = ?cli.user,
        at      = ?cli.at,
        watch   = cli.watch,
        next_up = ?cli.next_up,
        "Configuration"
    );

    // ── Load school + user files ──────────────────────────────────────────────
    let manager = SchoolManager::new();
    let school = match manager.load_from_file(&cli.school) {
        Ok(school) => school,
        Err(e) => {
            error!("Failed to load school definition: {:#}", e);
            process::exit(1);
        }
    };

    let overlay = match &cli.user {
        Some(path) => match UserOverlay::load_from_file(path) {
            Ok(overlay) => overlay,
            Err(e) => {
                error!("Failed to load user file: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            warn!("No user file provided, classes will show as '???'");
            UserOverlay::new()
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    if cli.watch {
        watch(&manager, &cli.school, &overlay, cli.next_up).await;
    } else {
        let now = cli.at.unwrap_or_else(|| school.local_now());
        println!("{}", render(&school, &overlay, now, cli.next_up));
    }
}

// ── Watch loop ────────────────────────────────────────────────────────────────

async fn watch(manager: &SchoolManager, path: &Path, overlay: &UserOverlay, next_up: NextUp) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut hangup = hangup_listener();

    info!("Watching, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(school) = manager.current() {
                    println!("{}\n", render(&school, overlay, school.local_now(), next_up));
                }
            }
            _ = wait_hangup(&mut hangup) => {
                info!("SIGHUP received, reloading {}", path.display());
                if let Err(e) = manager.reload_from_file(path) {
                    error!("Reload failed: {:#}", e);
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping");
                break;
            }
        }
    }
}

#[cfg(unix)]
type Hangup = Option<tokio::signal::unix::Signal>;
#[cfg(not(unix))]
type Hangup = ();

#[cfg(unix)]
fn hangup_listener() -> Hangup {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::hangup()) {
        Ok(sig) => Some(sig),
        Err(e) => {
            warn!("Cannot listen for SIGHUP, reload disabled: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn hangup_listener() -> Hangup {}

#[cfg(unix)]
async fn wait_hangup(hangup: &mut Hangup) {
    if let Some(sig) = hangup.as_mut() {
        if sig.recv().await.is_some() {
            return;
        }
    }
    *hangup = None;
    std::future::pending::<()>().await
}

#[cfg(not(unix))]
async fn wait_hangup(_: &mut Hangup) {
    std::future::pending::<()>().await
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render(school: &School, overlay: &UserOverlay, now: NaiveDateTime, next_up: NextUp) -> String {
    let resolver = school.resolver();
    let data = resolver.period_data(now);

    let mut lines = vec![
        format!(
            "{} | {} | {}",
            school.name(),
            now.format("%a %Y-%m-%d %H:%M:%S"),
            data.day.name()
        ),
        format!(
            "{}  ends in {}",
            overlay.label(&data.period),
            resolver.time_remaining(now)
        ),
    ];

    match next_up {
        NextUp::Disabled => {}
        NextUp::One => match resolver.next_class(now, DEFAULT_HORIZON_DAYS) {
            Some(up) => lines.push(format!(
                "Next: {}  starts in {}",
                overlay.label(&up.period),
                up.starts_in
            )),
            None => lines.push(String::from("Next: nothing scheduled")),
        },
        NextUp::All => {
            for period in resolver.remaining_periods_today(now) {
                lines.push(format!(
                    "  {:>12}-{:<12} {}",
                    period.start().to_string(),
                    period.end().to_string(),
                    overlay.label(&period)
                ));
            }
        }
    }

    lines.join("\n")
}
