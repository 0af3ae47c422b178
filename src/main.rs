//! # Matchcast — Sports Trigger Notification CLI
//!
//! Browse trigger calendars, inspect timeframe resolution and dispatch fired
//! conditions to social channels.
//!
//! Usage:
//!   matchcast resolve --time-frame monthly --month march --year 2024
//!   matchcast calendar --time-frame weekly --seed 25
//!   matchcast list --search "toss"
//!   matchcast fire --event fired.json
//!   matchcast fire --event '{"action":"match_summary", ...}'

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use matchcast_calendar::{calendar_view, resolve, CalendarFilters, CalendarRequest, RangeParams, Timeframe};
use matchcast_core::config::MatchcastConfig;
use matchcast_core::traits::TriggerStore as _;
use matchcast_core::types::TriggerDraft;
use matchcast_dispatch::{DispatchCoordinator, FiredEvent};
use matchcast_store::{fetch, seed, MemoryTriggerStore, PageRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "matchcast",
    version,
    about = "🏏 Matchcast — sports trigger notifications for social channels"
)]
struct Cli {
    /// Config file path (default: ~/.matchcast/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct TimeframeArgs {
    /// Timeframe keyword: daily, weekly, monthly, quarterly or yearly
    #[arg(long, default_value = "monthly")]
    time_frame: Timeframe,

    /// Year override (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Month override: name, 3-letter abbreviation or 1-12
    #[arg(long)]
    month: Option<String>,

    /// Week-of-month override for weekly views (1-based)
    #[arg(long)]
    week: Option<u32>,

    /// Day-of-month override for daily views
    #[arg(long)]
    date: Option<u32>,

    /// Quarter for quarterly views (1-4)
    #[arg(long)]
    quarter: Option<u32>,
}

impl TimeframeArgs {
    fn params(&self) -> RangeParams {
        RangeParams {
            year: self.year,
            month: self.month.clone(),
            week: self.week,
            date: self.date,
            quarter: self.quarter,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a timeframe to its absolute UTC range
    Resolve {
        #[command(flatten)]
        timeframe: TimeframeArgs,
    },

    /// Show the per-day trigger calendar for a timeframe
    Calendar {
        #[command(flatten)]
        timeframe: TimeframeArgs,

        /// Filter by exact trigger name
        #[arg(long)]
        name: Option<String>,

        /// Seed the in-memory store with N random triggers first
        #[arg(long)]
        seed: Option<usize>,

        #[arg(long, default_value = "1")]
        page: u64,

        #[arg(long, default_value = "10")]
        limit: u64,
    },

    /// List triggers, optionally by free-text search
    List {
        /// Case-insensitive needle matched across all trigger fields
        #[arg(long)]
        search: Option<String>,

        /// Seed the in-memory store with N random triggers first
        #[arg(long)]
        seed: Option<usize>,

        #[arg(long, default_value = "1")]
        page: u64,

        #[arg(long, default_value = "10")]
        limit: u64,
    },

    /// Dispatch a fired condition: path to a JSON event file, or inline JSON
    Fire {
        #[arg(long)]
        event: String,

        /// Trigger drafts to load before dispatching (JSON array, path or inline)
        #[arg(long)]
        triggers: Option<String>,
    },
}

fn load_config(path: Option<&str>) -> Result<MatchcastConfig> {
    Ok(match path {
        Some(p) => MatchcastConfig::load_from(std::path::Path::new(p))?,
        None => MatchcastConfig::load()?,
    })
}

fn read_json_arg(input: &str) -> Result<String> {
    if std::path::Path::new(input).exists() {
        Ok(std::fs::read_to_string(input)?)
    } else {
        Ok(input.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "matchcast=debug" } else { "matchcast=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::Resolve { timeframe } => {
            let range = resolve(timeframe.time_frame, &timeframe.params())?;
            println!("📅 {} resolves to:", timeframe.time_frame);
            println!("   Start: {}", range.start.to_rfc3339());
            println!("   End:   {}", range.end.to_rfc3339());
        }

        Command::Calendar { timeframe, name, seed: seed_count, page, limit } => {
            let store = MemoryTriggerStore::new();
            if let Some(count) = seed_count {
                seed(&store, count).await?;
                println!("🌱 Seeded {count} random triggers");
            }

            let request = CalendarRequest {
                time_frame: timeframe.time_frame,
                params: timeframe.params(),
                filters: CalendarFilters { name, ..Default::default() },
                page,
                limit,
            };
            let view = calendar_view(&store, &request).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        Command::List { search, seed: seed_count, page, limit } => {
            let store = MemoryTriggerStore::new();
            if let Some(count) = seed_count {
                seed(&store, count).await?;
                println!("🌱 Seeded {count} random triggers");
            }

            let listing = fetch(
                &store,
                search.as_deref(),
                PageRequest { page, limit, ..Default::default() },
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }

        Command::Fire { event, triggers } => {
            let config = load_config(cli.config.as_deref())?;
            let event: FiredEvent = serde_json::from_str(&read_json_arg(&event)?)?;
            let store = Arc::new(MemoryTriggerStore::new());

            if let Some(input) = triggers {
                let drafts: Vec<TriggerDraft> = serde_json::from_str(&read_json_arg(&input)?)?;
                let count = drafts.len();
                for draft in drafts {
                    store.insert(draft.build()?).await?;
                }
                println!("📥 Loaded {count} trigger(s)");
            }

            let coordinator = DispatchCoordinator::from_config(&config, store.clone());

            println!(
                "📡 Firing ({}, {}, {})...",
                event.action, event.target_id, event.target_type
            );
            let report = coordinator.dispatch(&event).await?;
            println!("✅ Trigger {} dispatched", report.trigger_id);
            for outcome in &report.channels {
                match &outcome.outcome {
                    Ok(()) => println!("   ✅ {}", outcome.channel),
                    Err(reason) => println!("   ❌ {}: {reason}", outcome.channel),
                }
            }
        }
    }

    Ok(())
}
