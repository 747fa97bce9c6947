use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_dir: PathBuf,
    pub sync_latency: Duration,
    pub remote_timeout: Duration,
    pub sheets_api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("data"),
            sync_latency: Duration::from_millis(500),
            remote_timeout: Duration::from_secs(10),
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            data_dir: env::var("APP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            sync_latency: parse_var("SYNC_LATENCY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.sync_latency),
            remote_timeout: parse_var("SYNC_TIMEOUT_MS")
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.remote_timeout),
            sheets_api_base: env::var("SHEETS_API_BASE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.sheets_api_base),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid {name}={raw:?}, using default");
            None
        }
    }
}
