// config.rs
use std::str::FromStr;
use std::time::Duration;

use crate::errors::CrawlError;
use crate::scraper::query::{DEFAULT_API_BASE, DEFAULT_PER_PAGE};
use crate::scraper::{CrawlSettings, FetchSettings};

/// Process configuration, read from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub per_page: u64,
    pub workers: usize,
    pub request_delay_ms: u64,
    pub max_attempts: u32,
    pub timeout_secs: u64,
    pub db_path: String,
    pub jsonl_path: Option<String>,
    pub xlsx_path: Option<String>,
    pub max_runtime_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            workers: 4,
            request_delay_ms: 100,
            max_attempts: 3,
            timeout_secs: 60,
            db_path: "flats.sqlite3".to_string(),
            jsonl_path: None,
            xlsx_path: None,
            max_runtime_secs: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, CrawlError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, CrawlError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Ok(Self {
            api_base: get("FLATS_API_BASE").unwrap_or(defaults.api_base),
            per_page: parse_or(&get, "FLATS_PER_PAGE", defaults.per_page)?,
            workers: parse_or(&get, "FLATS_WORKERS", defaults.workers)?,
            request_delay_ms: parse_or(&get, "FLATS_REQUEST_DELAY_MS", defaults.request_delay_ms)?,
            max_attempts: parse_or(&get, "FLATS_MAX_ATTEMPTS", defaults.max_attempts)?,
            timeout_secs: parse_or(&get, "FLATS_TIMEOUT_SECS", defaults.timeout_secs)?,
            db_path: get("FLATS_DB_PATH").unwrap_or(defaults.db_path),
            jsonl_path: get("FLATS_JSONL_PATH"),
            xlsx_path: get("FLATS_XLSX_PATH"),
            max_runtime_secs: match get("FLATS_MAX_RUNTIME_SECS") {
                Some(raw) => Some(parse_value("FLATS_MAX_RUNTIME_SECS", &raw)?),
                None => None,
            },
        })
    }

    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            api_base: self.api_base.clone(),
            per_page: self.per_page,
            workers: self.workers,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_delay: Duration::from_millis(self.request_delay_ms),
            max_attempts: self.max_attempts,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn max_runtime(&self) -> Option<Duration> {
        self.max_runtime_secs.map(Duration::from_secs)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, CrawlError> {
    raw.trim()
        .parse()
        .map_err(|_| CrawlError::Config(format!("{key} has invalid value {raw:?}")))
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, CrawlError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
