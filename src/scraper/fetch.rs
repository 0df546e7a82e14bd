// fetch.rs
use rand::Rng;
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::errors::CrawlError;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const MAX_BACKOFF_SECS: u64 = 10;
const JITTER_MAX_MILLIS: u64 = 500;

/// Anything that can turn a URL into a response body.
///
/// The crawl core never retries; a returned error means "no data for this unit".
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, CrawlError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub request_delay: Duration,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(100),
            max_attempts: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Keeps a minimum spacing between consecutive requests across all workers.
#[derive(Debug)]
pub struct Throttle {
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: Mutex::new(None),
        }
    }

    /// Reserves the next request slot and sleeps until it arrives.
    pub fn wait(&self) {
        let wake_at = {
            let mut slot = match self.next_slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = Instant::now();
            let at = match *slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *slot = Some(at + self.spacing);
            at
        };

        let now = Instant::now();
        if wake_at > now {
            std::thread::sleep(wake_at - now);
        }
    }
}

pub struct HttpFetcher {
    client: Client,
    throttle: Throttle,
    max_attempts: u32,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CrawlError::Network(e.to_string()))?;

        Ok(Self {
            client,
            throttle: Throttle::new(settings.request_delay),
            max_attempts: settings.max_attempts.max(1),
        })
    }

    fn try_fetch(&self, url: &str) -> Result<String, CrawlError> {
        self.throttle.wait();

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| CrawlError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text().map_err(|e| CrawlError::Network(e.to_string()))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            let start = Instant::now();

            match self.try_fetch(url) {
                Ok(body) => {
                    debug!(url, attempt, elapsed = ?start.elapsed(), "fetched");
                    return Ok(body);
                }
                // A 404 will not get better by asking again.
                Err(CrawlError::HttpStatus { status: 404, url }) => {
                    return Err(CrawlError::HttpStatus { status: 404, url });
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "fetch attempt failed");
                    last_err = Some(e);

                    if attempt < self.max_attempts {
                        let base = std::cmp::min(attempt as u64, MAX_BACKOFF_SECS);
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MILLIS);
                        std::thread::sleep(
                            Duration::from_secs(base) + Duration::from_millis(jitter),
                        );
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CrawlError::Network("fetch retry loop failed".into())))
    }
}
