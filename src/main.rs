use flats_scraper::db::{self, runs, Database};
use flats_scraper::sink::{FanoutSink, JsonLinesSink, SqliteSink};
use flats_scraper::spreadsheets::export_records_xlsx;
use flats_scraper::{Config, CrawlError, CrawlStats, Crawler, HttpFetcher};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!(error = %e, "❌ Crawl setup failed");
        std::process::exit(1);
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

fn run() -> Result<(), CrawlError> {
    let config = Config::from_env()?;
    info!(?config, "Starting crawl");

    // 1️⃣ Database
    let db = Database::new(config.db_path.clone());
    db::init_db(&db)?;

    // 2️⃣ Sinks
    let mut sink = FanoutSink::new().push(SqliteSink::new(db.clone()));
    if let Some(path) = &config.jsonl_path {
        sink = sink.push(JsonLinesSink::create(path)?);
    }

    // 3️⃣ Crawl
    let fetcher = HttpFetcher::new(config.fetch_settings())?;
    let crawler = Crawler::new(fetcher, sink, config.crawl_settings());

    if let Some(limit) = config.max_runtime() {
        let stop = crawler.stop_handle();
        std::thread::spawn(move || {
            std::thread::sleep(limit);
            warn!(?limit, "Maximum runtime reached, no new requests will be issued");
            stop.request_stop();
        });
    }

    let run_id = db.with_conn(|conn| runs::start_crawl_run(conn, now_unix()))?;

    let result = crawler.run();
    let (stats, err_msg) = match &result {
        Ok(stats) => (*stats, None),
        Err(e) => (CrawlStats::default(), Some(e.to_string())),
    };

    if let Err(e) = db.with_conn(|conn| runs::end_crawl_run(conn, run_id, now_unix(), &stats, err_msg.clone())) {
        warn!(error = %e, "Failed to record crawl run");
    }

    let stats = result?;
    info!(
        records = stats.records_emitted,
        failed = stats.listings_failed,
        pages = stats.pages_fetched,
        "✅ Crawl complete"
    );

    // 4️⃣ Optional spreadsheet of everything stored so far
    if let Some(path) = &config.xlsx_path {
        let records = db::load_records(&db)?;
        export_records_xlsx(&records, path)?;
        info!(path = %path, rows = records.len(), "Exported spreadsheet");
    }

    Ok(())
}
