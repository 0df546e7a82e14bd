// src/extract/detail.rs
use tracing::trace;

use crate::domain::tables::{unit_type_label, FIELD_DISPOSITION, FIELD_UNIT_TYPE};
use crate::domain::{FieldValue, Record};
use crate::errors::CrawlError;
use crate::extract::fields;
use crate::scraper::models::{AttributeValue, DetailPayload};

/// Columns copied verbatim.
pub const PASS_THROUGH_COLUMNS: [&str; 4] = ["Stavba", "Stav objektu", "Vlastnictví", "Výtah"];

/// Columns that go through a field extractor.
pub const PARSED_COLUMNS: [&str; 9] = [
    "Podlaží",
    "Užitná plocha",
    "Obytná plocha",
    "Celková plocha",
    "Plocha podlahová",
    "Energetická náročnost budovy",
    "Balkón",
    "Lodžie",
    "Terasa",
];

const FLOOR_COLUMN: &str = "Podlaží";
const ENERGY_COLUMN: &str = "Energetická náročnost budovy";
const AMENITY_COLUMNS: [&str; 3] = ["Balkón", "Lodžie", "Terasa"];

/// Which extractor a detail attribute is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    PassThrough,
    Floor,
    Area,
    Amenity,
    EnergyClass,
}

/// Looks an attribute name up in the column table; unknown names give `None`.
pub fn classify(name: &str) -> Option<ColumnKind> {
    if PASS_THROUGH_COLUMNS.contains(&name) {
        return Some(ColumnKind::PassThrough);
    }
    if !PARSED_COLUMNS.contains(&name) {
        return None;
    }

    if name == FLOOR_COLUMN {
        Some(ColumnKind::Floor)
    } else if name.to_lowercase().contains("plocha") {
        Some(ColumnKind::Area)
    } else if AMENITY_COLUMNS.contains(&name) {
        Some(ColumnKind::Amenity)
    } else if name == ENERGY_COLUMN {
        Some(ColumnKind::EnergyClass)
    } else {
        None
    }
}

fn text(value: &AttributeValue) -> Option<&str> {
    match value {
        AttributeValue::Text(s) => Some(s),
        _ => None,
    }
}

/// Runs the extractor for `kind` over one attribute value.
pub fn extract(kind: ColumnKind, value: &AttributeValue) -> Option<FieldValue> {
    match kind {
        ColumnKind::PassThrough => fields::pass_through(value),
        ColumnKind::Floor => text(value).and_then(fields::floor).map(FieldValue::Integer),
        ColumnKind::Area => text(value).and_then(fields::area).map(FieldValue::Float),
        ColumnKind::Amenity => fields::amenity(value),
        ColumnKind::EnergyClass => text(value)
            .and_then(fields::energy_class)
            .map(FieldValue::Text),
    }
}

/// Completes a partial record from one detail payload.
///
/// Missing or unparsable attributes are left out of the result. The only
/// error is an unknown unit-type code, which means the marketplace schema
/// changed and the listing should not be emitted as if nothing happened.
pub fn normalize_detail(payload: &DetailPayload, record: Record) -> Result<Record, CrawlError> {
    let mut record = record.with_opt(
        FIELD_DISPOSITION,
        payload.display_name().and_then(fields::disposition),
    );

    for item in &payload.items {
        let Some(kind) = classify(&item.name) else {
            trace!(name = %item.name, "dropping unclassified attribute");
            continue;
        };
        record = record.with_opt(item.name.as_str(), extract(kind, &item.value));
    }

    if let Some(code) = payload.category_code() {
        let label = unit_type_label(code).ok_or(CrawlError::UnknownUnitType(code))?;
        record = record.with(FIELD_UNIT_TYPE, label);
    }

    Ok(record)
}
