/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Walks a date range through a school file and prints every day.
//!
//! For each date the resolved day schedule is printed, then every period
//! found by chaining `next_period_today` from midnight.  Useful for eyeballing
//! exception weeks and school-year bounds before deploying a new file.
//!
//! ```text
//! day-walker --school configs/sample_school.yaml --from 2021-11-14 --to 2021-11-27
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate};
use clap::Parser;
use tracing::info;

use period_countdown::calendar::week_tag;
use period_countdown::config::School;
use period_countdown::time::TimeOfDay;

#[derive(Debug, Parser)]
#[command(name = "day-walker", about = "Print the resolved schedule for a range of dates")]
struct Cli {
    /// Path to the YAML school definition.
    #[arg(short = 's', long = "school")]
    school: PathBuf,

    /// First date to print (YYYY-MM-DD).
    #[arg(short = 'f', long = "from")]
    from: NaiveDate,

    /// Last date to print, inclusive (YYYY-MM-DD).
    #[arg(short = 't', long = "to")]
    to: NaiveDate,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.from > cli.to {
        bail!("--from {} is after --to {}", cli.from, cli.to);
    }

    let school = School::load_from_file(&cli.school)
        .with_context(|| format!("Cannot load {}", cli.school.display()))?;
    let resolver = school.resolver();

    info!(school = school.name(), from = %cli.from, to = %cli.to, "Walking dates");

    let mut date = cli.from;
    while date <= cli.to {
        let day = resolver.day(date);
        let exception = school
            .calendar()
            .exception_for(date)
            .map(|week| format!(" [exception: {}]", week.name()))
            .unwrap_or_default();
        println!(
            "{} {} (week of {}): {}{}",
            date.format("%a"),
            date,
            week_tag(date),
            day.name(),
            exception
        );

        let mut cursor = TimeOfDay::MIDNIGHT.on(date);
        while let Some(period) = resolver.next_period_today(cursor) {
            println!(
                "    {:>12} - {:<12} [{:>7}] {}",
                period.start().to_string(),
                period.end().to_string(),
                period.id().to_string(),
                period.name()
            );
            cursor = period.end().on(date);
        }

        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(())
}
