use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use url::Url;

use crate::db::{init_db, Database};
use crate::domain::Region;
use crate::errors::CrawlError;
use crate::scraper::fetch::Fetch;
use crate::scraper::query::SearchQuery;

pub const TEST_API: &str = "https://test.local/api";

/// Serves canned bodies by exact URL and remembers every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: impl Into<String>, body: Value) -> Self {
        self.routes.insert(url.into(), body.to_string());
        self
    }

    pub fn route_raw(mut self, url: impl Into<String>, body: &str) -> Self {
        self.routes.insert(url.into(), body.to_string());
        self
    }

    pub fn search(self, region: Region, page: u64, body: Value) -> Self {
        let url = search_url(region, page);
        self.route(url, body)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| CrawlError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

/// Pretends to be a search endpoint over `result_size` listings.
pub struct PagedApi {
    pub result_size: u64,
    pub per_page: u64,
    /// When set, every response claims to be this page.
    pub echo_page: Option<u64>,
    /// Requests for this page fail as a network error.
    pub failing_page: Option<u64>,
    pub requested_pages: Mutex<Vec<u64>>,
}

impl PagedApi {
    pub fn new(result_size: u64, per_page: u64) -> Self {
        Self {
            result_size,
            per_page,
            echo_page: None,
            failing_page: None,
            requested_pages: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(&self) -> Vec<u64> {
        self.requested_pages.lock().unwrap().clone()
    }
}

impl Fetch for PagedApi {
    fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let parsed = Url::parse(url).map_err(|e| CrawlError::Network(e.to_string()))?;
        let page: u64 = parsed
            .query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .ok_or_else(|| CrawlError::Network("no page param".into()))?;
        self.requested_pages.lock().unwrap().push(page);
        if self.failing_page == Some(page) {
            return Err(CrawlError::Network(format!("page {page} timed out")));
        }

        let start = (page - 1) * self.per_page;
        let end = (page * self.per_page).min(self.result_size);
        let estates: Vec<Value> = (start..end).map(|id| estate(id, 1_000_000 + id as i64, "Celková cena")).collect();

        Ok(json!({
            "result_size": self.result_size,
            "per_page": self.per_page,
            "page": self.echo_page.unwrap_or(page),
            "_embedded": { "estates": estates },
        })
        .to_string())
    }
}

pub fn search_url(region: Region, page: u64) -> String {
    SearchQuery::first_page(region.code, 999)
        .with_page(page)
        .to_url(TEST_API)
        .unwrap()
        .to_string()
}

pub fn detail_href(id: u64) -> String {
    format!("/cs/v2/estates/{id}")
}

pub fn detail_url(id: u64) -> String {
    format!("{TEST_API}{}", detail_href(id))
}

pub fn estate(id: u64, price: i64, price_name: &str) -> Value {
    json!({
        "price_czk": { "value_raw": price, "name": price_name },
        "_links": { "self": { "href": detail_href(id) } },
    })
}

pub fn search_body(estates: Vec<Value>) -> Value {
    let n = estates.len();
    json!({
        "result_size": n,
        "per_page": 999,
        "page": 1,
        "_embedded": { "estates": estates },
    })
}

pub fn detail_body(name: &str, items: Value, category: i64) -> Value {
    json!({
        "name": { "value": name },
        "items": items,
        "seo": { "category_main_cb": category },
    })
}

/// A fresh, schema-initialized database in the temp dir.
pub fn make_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db).expect("Failed to initialize DB");
    db
}
