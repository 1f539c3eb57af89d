use anyhow::{Context, Result, anyhow};
use cachesched_core::{DesiredState, ExpirationSpread, Schedule, SwitchOverPoint};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "cachesched.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// IANA time zone the schedule is written in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// TTL in seconds while content is up to date.
    pub default_ttl: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<ExpirationSpread>,
    #[serde(default)]
    pub windows: Vec<WindowSection>,
}

/// One switch-over: `state` holds from `from` until the next window starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSection {
    pub state: DesiredState,
    pub from: SwitchOverPoint,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    /// Starter config: fresh Monday 09:00 until Friday 17:00, up to a minute of spread.
    pub fn office_hours() -> Result<Self> {
        let windows = vec![
            WindowSection {
                state: DesiredState::UpToDate,
                from: SwitchOverPoint::new(1, 9, 0)?,
            },
            WindowSection {
                state: DesiredState::Stale,
                from: SwitchOverPoint::new(5, 17, 0)?,
            },
        ];

        Ok(Self {
            timezone: default_timezone(),
            default_ttl: 300,
            spread: Some(ExpirationSpread::new(0, 60)?),
            windows,
        })
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone: {}", self.timezone))
    }

    pub fn schedule(&self) -> Schedule {
        self.windows
            .iter()
            .fold(Schedule::new(), |schedule, w| schedule.with_state_from(w.from, w.state))
    }
}

pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os("CACHESCHED_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn load_config(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Config::office_hours();
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(p: &Path) -> Result<()> {
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(p, &Config::office_hours()?)?;
    println!("Wrote {}", p.display());
    Ok(())
}
