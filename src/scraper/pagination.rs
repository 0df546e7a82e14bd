// pagination.rs
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::domain::Region;
use crate::errors::CrawlError;
use crate::scraper::fetch::Fetch;
use crate::scraper::models::{EstateEntry, SearchResponse};
use crate::scraper::query::SearchQuery;

/// What the crawl needs from one search result entry to reach its detail.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub region: Region,
    pub price: Option<i64>,
    pub price_kind: Option<String>,
    pub detail_href: Option<String>,
}

impl ListingSummary {
    fn from_entry(region: Region, entry: &EstateEntry) -> Self {
        let price_czk = entry.price_czk.as_ref();

        // Zero and empty values count as missing.
        let price = price_czk
            .and_then(|p| p.value_raw)
            .filter(|v| *v != 0.0)
            .map(|v| v as i64);
        let price_kind = price_czk
            .and_then(|p| p.name.clone())
            .filter(|s| !s.is_empty());

        Self {
            region,
            price,
            price_kind,
            detail_href: entry.detail_href().map(str::to_string),
        }
    }
}

/// One fetched search page, already reduced to summaries.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub query: SearchQuery,
    pub summaries: Vec<ListingSummary>,
    /// Entries that could not be read as a listing at all.
    pub dropped: usize,
    pub bound: Option<PageBound>,
}

/// The result-set size a search response announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBound {
    pub result_size: u64,
    pub per_page: u64,
}

impl PageBound {
    /// Missing or zero `result_size`/`per_page` mean no bound.
    pub fn from_response(resp: &SearchResponse) -> Option<Self> {
        Some(Self {
            result_size: resp.result_size.filter(|n| *n > 0)?,
            per_page: resp.per_page.filter(|n| *n > 0)?,
        })
    }

    /// The query for the page after `page`, if the bound leaves room for one.
    ///
    /// The page counter never goes backwards, so a response that keeps echoing
    /// an old page number cannot keep the walk alive past `result_size`.
    pub fn after(&self, requested: SearchQuery, page: u64) -> Option<SearchQuery> {
        let current = page.max(requested.page);
        if current.saturating_mul(self.per_page) < self.result_size {
            Some(requested.with_page(current + 1))
        } else {
            None
        }
    }
}

/// Decides whether another page follows the one just received.
///
/// Any missing or zero pagination field ends the walk.
pub fn next_page(requested: SearchQuery, resp: &SearchResponse) -> Option<SearchQuery> {
    let bound = PageBound::from_response(resp)?;
    let page = resp.page.filter(|n| *n > 0)?;
    bound.after(requested, page)
}

/// Parses a search response body into a page of summaries plus its follow-up query.
///
/// Entries are read one by one; an entry that is not a listing object is
/// counted in `dropped` and its siblings are kept.
pub fn parse_search_page(
    region: Region,
    query: SearchQuery,
    body: &str,
) -> Result<(SearchPage, Option<SearchQuery>), CrawlError> {
    let resp: SearchResponse = serde_json::from_str(body)?;

    let mut summaries = Vec::new();
    let mut dropped = 0;
    for raw in resp.embedded.iter().flat_map(|e| e.estates.iter()) {
        match serde_json::from_value::<EstateEntry>(raw.clone()) {
            Ok(entry) => summaries.push(ListingSummary::from_entry(region, &entry)),
            Err(e) => {
                dropped += 1;
                warn!(region = region.name, page = query.page, error = %e, "⚠️ Skipping unreadable search entry");
            }
        }
    }

    let next = next_page(query, &resp);
    let page = SearchPage {
        query,
        summaries,
        dropped,
        bound: PageBound::from_response(&resp),
    };
    Ok((page, next))
}

/// Lazily walks every search page of one region.
///
/// Each call to `next` issues at most one request. A failed request or an
/// unparsable page is yielded as an error. The walk then goes on with the
/// following page if an earlier response announced a bound that covers it;
/// a failure before any bound is known ends the walk.
pub struct Paginator<'a, F: Fetch> {
    fetcher: &'a F,
    api_base: &'a str,
    region: Region,
    pending: Option<SearchQuery>,
    bound: Option<PageBound>,
    stop: Option<&'a AtomicBool>,
}

impl<'a, F: Fetch> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, api_base: &'a str, region: Region, per_page: u64) -> Self {
        Self {
            fetcher,
            api_base,
            region,
            pending: Some(SearchQuery::first_page(region.code, per_page)),
            bound: None,
            stop: None,
        }
    }

    /// Stops issuing requests once `flag` is raised.
    pub fn with_stop_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.stop = Some(flag);
        self
    }

    fn fetch_page(
        &self,
        query: SearchQuery,
    ) -> Result<(SearchPage, Option<SearchQuery>), CrawlError> {
        let url = query.to_url(self.api_base)?;
        debug!(region = self.region.name, page = query.page, url = %url, "fetching search page");

        let body = self.fetcher.fetch(url.as_str())?;
        parse_search_page(self.region, query, &body)
    }

    fn stopped(&self) -> bool {
        self.stop.map(|f| f.load(Ordering::SeqCst)).unwrap_or(false)
    }

    /// Flattens the walk into listing summaries, dropping failed pages.
    pub fn summaries(self) -> impl Iterator<Item = ListingSummary> + 'a
    where
        F: 'a,
    {
        self.filter_map(Result::ok).flat_map(|page| page.summaries)
    }
}

impl<'a, F: Fetch> Iterator for Paginator<'a, F> {
    type Item = Result<SearchPage, CrawlError>;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.pending.take()?;

        if self.stopped() {
            info!(region = self.region.name, page = query.page, "stop requested, ending pagination");
            return None;
        }

        match self.fetch_page(query) {
            Ok((page, next)) => {
                if page.bound.is_some() {
                    self.bound = page.bound;
                }
                self.pending = next;
                Some(Ok(page))
            }
            Err(e) => {
                self.pending = self.bound.and_then(|b| b.after(query, query.page));
                Some(Err(e))
            }
        }
    }
}
