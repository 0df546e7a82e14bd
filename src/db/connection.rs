use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use crate::errors::CrawlError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Writers from other worker threads may hold the lock briefly.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

// Thread-local connections, keyed by database path.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

#[derive(Debug, Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs `f` with this thread's connection, opening it on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, CrawlError>
    where
        F: FnOnce(&mut Connection) -> Result<T, CrawlError>,
    {
        let inner_result = DB_CONNS
            .try_with(|cell| {
                let mut conns = cell.borrow_mut();
                if !conns.contains_key(&self.path) {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| CrawlError::Db(format!("Open DB failed: {e}")))?;
                    conn.busy_timeout(BUSY_TIMEOUT)?;
                    conns.insert(self.path.clone(), conn);
                }
                match conns.get_mut(&self.path) {
                    Some(conn) => f(conn),
                    None => Err(CrawlError::Db("connection slot missing".into())),
                }
            })
            .map_err(|e| CrawlError::Db(format!("thread-local connection unavailable: {e}")))?;
        inner_result
    }
}

/// Applies the embedded schema.
pub fn init_db(db: &Database) -> Result<(), CrawlError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| CrawlError::Db(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!(path = db.path(), "✅ Database initialized");
    Ok(())
}
