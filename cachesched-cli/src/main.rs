use anyhow::{Context, Result};
use cachesched_core::{Clock, DesiredState, FixedClock, Scheduler, SwitchOverPoint, SystemClock};
use chrono::DateTime;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

mod config;
mod time;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "cachesched", version, about = "Cache TTLs from a weekly freshness schedule")]
struct Cli {
    /// Config file (default: $CACHESCHED_CONFIG or ./cachesched.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config file
    Init,

    /// Print the TTL to use for content cached now
    Ttl {
        /// TTL while up to date (defaults to `default_ttl` from config)
        #[arg(long)]
        default_ttl: Option<i64>,

        #[command(flatten)]
        at: AtArgs,
    },

    /// Print the desired state and the next up-to-date switch-over
    State {
        #[command(flatten)]
        at: AtArgs,
    },
}

#[derive(clap::Args, Debug)]
struct AtArgs {
    /// Evaluate at this moment instead of now (RFC 3339 or "YYYY-MM-DD HH:MM" local)
    #[arg(long)]
    at: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TtlReport {
    now: String,
    ttl: i64,
}

#[derive(Debug, Serialize)]
struct StateReport {
    now: String,
    state: DesiredState,
    next_up_to_date: Option<SwitchOverPoint>,
    seconds_until_up_to_date: Option<i64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = config::config_path(cli.config);

    match cli.command {
        Command::Init => config::init_config(&path)?,

        Command::Ttl { default_ttl, at } => {
            let cfg = config::load_config(&path)?;
            let now = resolve_now(&cfg, at.at.as_deref())?;
            let report = ttl_report(&cfg, now, default_ttl.unwrap_or(cfg.default_ttl))
                .with_context(|| format!("schedule from {}", path.display()))?;

            if at.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.ttl);
            }
        }

        Command::State { at } => {
            let cfg = config::load_config(&path)?;
            let now = resolve_now(&cfg, at.at.as_deref())?;
            let schedule = cfg.schedule();
            if schedule.is_clear() {
                anyhow::bail!("no windows defined in {}", path.display());
            }

            let next = schedule.find_next_up_to_date_switch_over_point(&now).ok();
            let seconds = next
                .map(|point| cachesched_core::seconds_until(point, &now))
                .transpose()?;
            let report = StateReport {
                now: now.to_rfc3339(),
                state: schedule.desired_state(&now)?,
                next_up_to_date: next,
                seconds_until_up_to_date: seconds,
            };

            if at.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Now:   {}", report.now);
                println!("State: {:?}", report.state);
                match (report.next_up_to_date, report.seconds_until_up_to_date) {
                    (Some(point), Some(secs)) => println!("Next up to date: {point} (in {secs}s)"),
                    _ => println!("Next up to date: never (no up-to-date window)"),
                }
            }
        }
    }

    Ok(())
}

/// TTL through the library only; computation failures already fell back inside it.
fn ttl_report(cfg: &Config, now: DateTime<Tz>, up_to_date_ttl: i64) -> Result<TtlReport> {
    let mut scheduler = Scheduler::new(FixedClock::new(now)).set_schedule(cfg.schedule());
    if let Some(spread) = cfg.spread {
        scheduler = scheduler.set_expiration_spread(spread);
    }

    let ttl = scheduler.calculate_time_to_live(up_to_date_ttl, None, None)?;
    Ok(TtlReport {
        now: now.to_rfc3339(),
        ttl,
    })
}

fn resolve_now(cfg: &Config, at: Option<&str>) -> Result<DateTime<Tz>> {
    let tz = cfg.time_zone()?;
    match at {
        Some(s) => time::parse_at(s, tz),
        None => Ok(SystemClock::new(tz).current_date_time()?),
    }
}
