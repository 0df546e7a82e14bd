pub mod crawler;
pub mod fetch;
pub mod models;
pub mod pagination;
pub mod query;

pub use crawler::{CrawlSettings, CrawlStats, Crawler, StopHandle};
pub use fetch::{Fetch, FetchSettings, HttpFetcher};
pub use pagination::{ListingSummary, Paginator, SearchPage};
pub use query::SearchQuery;
