use rusqlite::{params, Connection};

use crate::scraper::CrawlStats;
use crate::errors::CrawlError;

#[derive(Debug)]
pub struct CrawlRun {
    pub id: i64,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub pages_fetched: Option<i64>,
    pub records_emitted: Option<i64>,
    pub listings_failed: Option<i64>,
    pub success: bool,
    pub error_message: Option<String>,
}

pub fn start_crawl_run(conn: &Connection, now: i64) -> Result<i64, CrawlError> {
    conn.execute(
        "INSERT INTO crawl_runs (started_at, success) VALUES (?, 0)",
        params![now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn end_crawl_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    stats: &CrawlStats,
    error: Option<String>,
) -> Result<(), CrawlError> {
    conn.execute(
        "UPDATE crawl_runs SET finished_at = ?, pages_fetched = ?, pages_failed = ?, listings_seen = ?, records_emitted = ?, listings_failed = ?, success = ?, error_message = ? WHERE id = ?",
        params![
            now,
            stats.pages_fetched,
            stats.pages_failed,
            stats.listings_seen,
            stats.records_emitted,
            stats.listings_failed,
            error.is_none(),
            error,
            run_id
        ],
    )?;
    Ok(())
}

pub fn get_recent_runs(conn: &Connection) -> Result<Vec<CrawlRun>, CrawlError> {
    let mut stmt = conn.prepare(
        "SELECT id, started_at, finished_at, pages_fetched, records_emitted, listings_failed, success, error_message FROM crawl_runs ORDER BY started_at DESC, id DESC LIMIT 50",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CrawlRun {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            pages_fetched: row.get(3)?,
            records_emitted: row.get(4)?,
            listings_failed: row.get(5)?,
            success: row.get(6)?,
            error_message: row.get(7)?,
        })
    })?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r?);
    }
    Ok(runs)
}
