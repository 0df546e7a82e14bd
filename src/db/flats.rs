use chrono::Utc;
use rusqlite::params;

use crate::db::connection::Database;
use crate::domain::tables::{
    FIELD_API_DETAIL, FIELD_DISPOSITION, FIELD_PRICE, FIELD_PRICE_KIND, FIELD_REGION,
    FIELD_UNIT_TYPE,
};
use crate::domain::Record;
use crate::errors::CrawlError;

/// Inserts a record, or refreshes the row already stored for its detail URL.
pub fn save_record(db: &Database, record: &Record) -> Result<(), CrawlError> {
    let now = Utc::now().naive_utc();
    let payload = serde_json::to_string(record)?;

    let text = |key: &str| record.get(key).and_then(|v| v.as_text()).map(str::to_string);

    let api_detail = text(FIELD_API_DETAIL);
    let region = text(FIELD_REGION).unwrap_or_default();
    let price = record.get(FIELD_PRICE).and_then(|v| v.as_i64());
    let price_kind = text(FIELD_PRICE_KIND);
    let disposition = text(FIELD_DISPOSITION);
    let unit_type = text(FIELD_UNIT_TYPE);

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO flats (
                api_detail, region, price, price_kind, disposition, unit_type,
                payload, first_seen_at, scraped_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(api_detail) DO UPDATE SET
                region = excluded.region,
                price = excluded.price,
                price_kind = excluded.price_kind,
                disposition = excluded.disposition,
                unit_type = excluded.unit_type,
                payload = excluded.payload,
                scraped_at = excluded.scraped_at
            "#,
            params![api_detail, region, price, price_kind, disposition, unit_type, payload, now],
        )?;
        Ok(())
    })
}

/// Loads every stored record, oldest first.
pub fn load_records(db: &Database) -> Result<Vec<Record>, CrawlError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT payload FROM flats ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for r in rows {
            let payload = r?;
            records.push(serde_json::from_str(&payload)?);
        }
        Ok(records)
    })
}

pub fn count_records(db: &Database) -> Result<i64, CrawlError> {
    db.with_conn(|conn| {
        let n = conn.query_row("SELECT COUNT(*) FROM flats", [], |row| row.get(0))?;
        Ok(n)
    })
}
