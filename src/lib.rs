//! Crawls a real-estate marketplace's listing API region by region and
//! normalizes every listing detail into a typed record.

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod scraper;
pub mod sink;
pub mod spreadsheets;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use domain::{FieldValue, Record, Region, REGIONS};
pub use errors::CrawlError;
pub use scraper::{CrawlSettings, CrawlStats, Crawler, Fetch, HttpFetcher, StopHandle};
pub use sink::{FanoutSink, JsonLinesSink, MemorySink, RecordSink, SqliteSink};
