// errors.rs
use thiserror::Error;

/// Errors raised while crawling, normalizing or persisting listings.
///
/// None of these is fatal to a whole crawl: the orchestrator scopes every
/// failure to the page or listing that produced it.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unknown price kind label: {0:?}")]
    UnknownPriceKind(String),

    #[error("Unknown unit type code: {0}")]
    UnknownUnitType(i64),

    #[error("Listing has no detail link")]
    MissingDetailLink,

    #[error("Database error: {0}")]
    Db(String),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Crawl stopped")]
    Stopped,
}

impl CrawlError {
    /// Lookup failures mean the marketplace schema changed under us.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            CrawlError::UnknownPriceKind(_) | CrawlError::UnknownUnitType(_)
        )
    }
}

impl From<serde_json::Error> for CrawlError {
    fn from(e: serde_json::Error) -> Self {
        CrawlError::JsonParse(e.to_string())
    }
}

impl From<rusqlite::Error> for CrawlError {
    fn from(e: rusqlite::Error) -> Self {
        CrawlError::Db(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CrawlError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CrawlError::Xlsx(e.to_string())
    }
}
