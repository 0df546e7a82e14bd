// crawler.rs
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::tables::{
    price_kind_code, FIELD_API_DETAIL, FIELD_PRICE, FIELD_PRICE_KIND, FIELD_REGION, REGIONS,
};
use crate::domain::{Record, Region};
use crate::errors::CrawlError;
use crate::extract::normalize_detail;
use crate::scraper::fetch::Fetch;
use crate::scraper::models::DetailPayload;
use crate::scraper::pagination::{ListingSummary, Paginator};
use crate::scraper::query::{detail_url, DEFAULT_API_BASE, DEFAULT_PER_PAGE};
use crate::sink::RecordSink;

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub api_base: String,
    pub per_page: u64,
    pub workers: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            workers: 4,
        }
    }
}

/// Shared flag asking the crawl to stop issuing new requests.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn flag(&self) -> &AtomicBool {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub listings_seen: usize,
    pub records_emitted: usize,
    pub listings_failed: usize,
    pub listings_skipped: usize,
}

#[derive(Default)]
struct Counters {
    pages_fetched: AtomicUsize,
    pages_failed: AtomicUsize,
    listings_seen: AtomicUsize,
    records_emitted: AtomicUsize,
    listings_failed: AtomicUsize,
    listings_skipped: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            listings_seen: self.listings_seen.load(Ordering::Relaxed),
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            listings_failed: self.listings_failed.load(Ordering::Relaxed),
            listings_skipped: self.listings_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Drives pagination and detail normalization over every region.
///
/// Regions and listings are independent work items on a bounded thread pool.
/// Nothing is shared between them except the fetcher, the sink and the
/// counters; each listing owns its own record from seed to emit.
pub struct Crawler<F: Fetch, S: RecordSink> {
    fetcher: F,
    sink: S,
    settings: CrawlSettings,
    stop: StopHandle,
}

impl<F: Fetch, S: RecordSink> Crawler<F, S> {
    pub fn new(fetcher: F, sink: S, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            sink,
            settings,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Crawls the full region table.
    pub fn run(&self) -> Result<CrawlStats, CrawlError> {
        self.run_regions(&REGIONS)
    }

    pub fn run_regions(&self, regions: &[Region]) -> Result<CrawlStats, CrawlError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.workers.max(1))
            .thread_name(|i| format!("crawl-worker-{i}"))
            .build()
            .map_err(|e| CrawlError::Config(format!("Failed to build worker pool: {e}")))?;

        let counters = Counters::default();

        pool.scope(|s| {
            for region in regions.iter().copied() {
                let counters = &counters;
                s.spawn(move |s| self.crawl_region(s, region, counters));
            }
        });

        let stats = counters.snapshot();
        info!(?stats, "🏁 Crawl finished");
        Ok(stats)
    }

    fn crawl_region<'s>(&'s self, scope: &rayon::Scope<'s>, region: Region, counters: &'s Counters) {
        info!(region = region.name, code = region.code, "🧵 Crawling region");

        let paginator = Paginator::new(
            &self.fetcher,
            &self.settings.api_base,
            region,
            self.settings.per_page,
        )
        .with_stop_flag(self.stop.flag());

        for page in paginator {
            match page {
                Ok(page) => {
                    Counters::bump(&counters.pages_fetched);
                    info!(
                        region = region.name,
                        page = page.query.page,
                        listings = page.summaries.len(),
                        dropped = page.dropped,
                        "✅ Search page parsed"
                    );

                    // Unreadable entries never reach a detail task.
                    counters.listings_seen.fetch_add(page.dropped, Ordering::Relaxed);
                    counters.listings_failed.fetch_add(page.dropped, Ordering::Relaxed);

                    for summary in page.summaries {
                        Counters::bump(&counters.listings_seen);
                        scope.spawn(move |_| self.handle_listing(summary, counters));
                    }
                }
                Err(e) => {
                    Counters::bump(&counters.pages_failed);
                    warn!(region = region.name, error = %e, "⚠️ Search page failed");
                }
            }
        }
    }

    fn handle_listing(&self, summary: ListingSummary, counters: &Counters) {
        let region = summary.region.name;

        let record = match self.process_listing(summary) {
            Ok(record) => record,
            Err(CrawlError::Stopped) => {
                Counters::bump(&counters.listings_skipped);
                return;
            }
            Err(e) if e.is_lookup_failure() => {
                Counters::bump(&counters.listings_failed);
                warn!(region, error = %e, "listing dropped, lookup table is missing a key");
                return;
            }
            Err(e) => {
                Counters::bump(&counters.listings_failed);
                warn!(region, error = %e, "listing dropped");
                return;
            }
        };

        match self.sink.emit(record) {
            Ok(()) => Counters::bump(&counters.records_emitted),
            Err(e) => {
                Counters::bump(&counters.listings_failed);
                error!(region, error = %e, "failed to emit record");
            }
        }
    }

    /// Seeds the record from the summary, fetches the detail and normalizes it.
    pub fn process_listing(&self, summary: ListingSummary) -> Result<Record, CrawlError> {
        let record = seed_record(&summary)?;

        let href = summary
            .detail_href
            .as_deref()
            .ok_or(CrawlError::MissingDetailLink)?;
        let url = detail_url(&self.settings.api_base, href);
        let record = record.with(FIELD_API_DETAIL, url.as_str());

        if self.stop.is_stopped() {
            return Err(CrawlError::Stopped);
        }

        debug!(url = %url, "fetching detail");
        let body = self.fetcher.fetch(&url)?;
        let payload: DetailPayload = serde_json::from_str(&body)?;

        normalize_detail(&payload, record)
    }
}

/// Region tag plus whatever price information the summary carried.
pub fn seed_record(summary: &ListingSummary) -> Result<Record, CrawlError> {
    let price_kind = match summary.price_kind.as_deref() {
        Some(label) => Some(
            price_kind_code(label).ok_or_else(|| CrawlError::UnknownPriceKind(label.to_string()))?,
        ),
        None => None,
    };

    Ok(Record::new()
        .with(FIELD_REGION, summary.region.name)
        .with_opt(FIELD_PRICE, summary.price)
        .with_opt(FIELD_PRICE_KIND, price_kind))
}
