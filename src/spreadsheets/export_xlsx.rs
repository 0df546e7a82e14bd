use rust_xlsxwriter::Workbook;
use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::tables::{
    FIELD_DISPOSITION, FIELD_PRICE, FIELD_PRICE_KIND, FIELD_REGION, FIELD_UNIT_TYPE,
};
use crate::domain::{FieldValue, Record};
use crate::errors::CrawlError;

const LEADING_COLUMNS: [&str; 5] = [
    FIELD_REGION,
    FIELD_PRICE,
    FIELD_PRICE_KIND,
    FIELD_DISPOSITION,
    FIELD_UNIT_TYPE,
];

/// Header row: the fixed leading columns, then every other key seen, sorted.
pub fn record_columns(records: &[Record]) -> Vec<String> {
    let rest: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys())
        .filter(|k| !LEADING_COLUMNS.contains(k))
        .collect();

    LEADING_COLUMNS
        .iter()
        .copied()
        .chain(rest)
        .map(str::to_string)
        .collect()
}

pub fn export_records_xlsx(records: &[Record], path: impl AsRef<Path>) -> Result<(), CrawlError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let columns = record_columns(records);

    for (col, header) in columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| CrawlError::Xlsx(format!("Failed to write header '{header}': {e}")))?;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, key) in columns.iter().enumerate() {
            let c = col as u16;
            let written = match record.get(key) {
                None => continue,
                Some(FieldValue::Text(s)) => worksheet.write_string(r, c, s).map(|_| ()),
                Some(FieldValue::Integer(n)) => worksheet.write_number(r, c, *n as f64).map(|_| ()),
                Some(FieldValue::Float(n)) => worksheet.write_number(r, c, *n).map(|_| ()),
                Some(FieldValue::Bool(b)) => worksheet.write_boolean(r, c, *b).map(|_| ()),
                Some(FieldValue::Json(v)) => worksheet.write_string(r, c, v.to_string()).map(|_| ()),
            };
            written.map_err(|e| CrawlError::Xlsx(format!("Failed to write '{key}': {e}")))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| CrawlError::Xlsx(format!("Failed to save workbook: {e}")))?;

    Ok(())
}
