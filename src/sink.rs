// sink.rs
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::error;

use crate::db::{self, Database};
use crate::domain::Record;
use crate::errors::CrawlError;

/// Receives every completed listing record, one call per listing.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: Record) -> Result<(), CrawlError>;
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: Record) -> Result<(), CrawlError> {
        match self.records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(())
    }
}

/// Appends one JSON object per line.
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn emit(&self, record: Record) -> Result<(), CrawlError> {
        let line = serde_json::to_string(&record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| CrawlError::Io(std::io::Error::other("JSONL writer poisoned")))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Stores records in the `flats` table.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    db: Database,
}

impl SqliteSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl RecordSink for SqliteSink {
    fn emit(&self, record: Record) -> Result<(), CrawlError> {
        db::save_record(&self.db, &record)
    }
}

/// Emits to every inner sink; a failing sink does not starve the others.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RecordSink for FanoutSink {
    fn emit(&self, record: Record) -> Result<(), CrawlError> {
        let mut first_err = None;

        for sink in &self.sinks {
            if let Err(e) = sink.emit(record.clone()) {
                error!(error = %e, "sink failed to store record");
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
