use serde_json::json;

use crate::domain::{FieldValue, Record};
use crate::errors::CrawlError;
use crate::extract::{classify, normalize_detail, ColumnKind};
use crate::scraper::models::DetailPayload;

fn payload(v: serde_json::Value) -> DetailPayload {
    serde_json::from_value(v).unwrap()
}

fn seed() -> Record {
    Record::new().with("region", "Praha")
}

#[test]
fn classify_routes_known_columns() {
    assert_eq!(classify("Stavba"), Some(ColumnKind::PassThrough));
    assert_eq!(classify("Výtah"), Some(ColumnKind::PassThrough));
    assert_eq!(classify("Podlaží"), Some(ColumnKind::Floor));
    assert_eq!(classify("Užitná plocha"), Some(ColumnKind::Area));
    assert_eq!(classify("Plocha podlahová"), Some(ColumnKind::Area));
    assert_eq!(classify("Lodžie"), Some(ColumnKind::Amenity));
    assert_eq!(
        classify("Energetická náročnost budovy"),
        Some(ColumnKind::EnergyClass)
    );
    assert_eq!(classify("Voda"), None);
    assert_eq!(classify("Plocha pozemku"), None);
}

#[test]
fn normalizes_every_column_family() {
    let p = payload(json!({
        "name": { "value": "Prodej bytu 3 + 1 78 m²" },
        "items": [
            { "name": "Stavba", "value": "Cihlová" },
            { "name": "Výtah", "value": true },
            { "name": "Podlaží", "value": "3. podlaží z 8" },
            { "name": "Celková plocha", "value": "78,4 m²" },
            { "name": "Terasa", "value": "12 m²" },
            { "name": "Lodžie", "value": 3 },
            { "name": "Energetická náročnost budovy", "value": "Třída B - Velmi úsporná" },
            { "name": "Voda", "value": [ { "value": "Dálkový vodovod" } ] },
        ],
        "seo": { "category_main_cb": 1 },
    }));

    let record = normalize_detail(&p, seed()).unwrap();

    assert_eq!(record.get("region"), Some(&FieldValue::Text("Praha".into())));
    assert_eq!(record.get("Dispozice"), Some(&FieldValue::Text("3+1".into())));
    assert_eq!(record.get("Stavba"), Some(&FieldValue::Text("Cihlová".into())));
    assert_eq!(record.get("Výtah"), Some(&FieldValue::Bool(true)));
    assert_eq!(record.get("Podlaží"), Some(&FieldValue::Integer(3)));
    assert_eq!(record.get("Celková plocha"), Some(&FieldValue::Float(78.4)));
    assert_eq!(record.get("Terasa"), Some(&FieldValue::Float(12.0)));
    assert_eq!(record.get("Lodžie"), Some(&FieldValue::Float(3.0)));
    assert_eq!(
        record.get("Energetická náročnost budovy"),
        Some(&FieldValue::Text("B".into()))
    );
    assert_eq!(record.get("typ"), Some(&FieldValue::Text("Byt".into())));
    assert!(!record.contains("Voda"));
}

#[test]
fn unparsable_values_are_omitted() {
    let p = payload(json!({
        "name": { "value": "Prodej bytu" },
        "items": [
            { "name": "Podlaží", "value": "přízemí" },
            { "name": "Užitná plocha", "value": "neuvedeno" },
            { "name": "Balkón", "value": "ano" },
            { "name": "Energetická náročnost budovy", "value": "neuvedeno" },
            { "name": "Podlaží", "value": 4 },
        ],
        "seo": { "category_main_cb": 1 },
    }));

    let record = normalize_detail(&p, seed()).unwrap();

    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, vec!["region", "typ"]);
}

#[test]
fn empty_payload_keeps_seed() {
    let record = normalize_detail(&payload(json!({})), seed()).unwrap();
    assert_eq!(record, seed());
}

#[test]
fn existing_fields_are_not_overwritten() {
    let p = payload(json!({
        "name": { "value": "Prodej bytu 2+kk" },
        "items": [ { "name": "Podlaží", "value": "5. podlaží" } ],
    }));
    let seeded = seed().with("Podlaží", 2i64);

    let record = normalize_detail(&p, seeded).unwrap();

    assert_eq!(record.get("Podlaží"), Some(&FieldValue::Integer(2)));
    assert_eq!(record.get("Dispozice"), Some(&FieldValue::Text("2+kk".into())));
}

#[test]
fn unknown_unit_type_is_a_lookup_failure() {
    let p = payload(json!({
        "name": { "value": "Prodej domu 5+1" },
        "items": [],
        "seo": { "category_main_cb": 2 },
    }));

    let err = normalize_detail(&p, seed()).unwrap_err();

    assert!(matches!(err, CrawlError::UnknownUnitType(2)));
    assert!(err.is_lookup_failure());
}

#[test]
fn malformed_items_are_skipped_and_siblings_kept() {
    let p = payload(json!({
        "name": { "value": "Prodej bytu 2+1" },
        "items": [
            { "name": 42, "value": "Cihlová" },
            { "value": "5. podlaží" },
            "Výtah",
            { "name": "Podlaží", "value": "2. podlaží" },
            { "name": "Obytná plocha", "value": "48 m²" },
        ],
        "seo": { "category_main_cb": 1 },
    }));

    let record = normalize_detail(&p, seed()).unwrap();

    assert_eq!(record.get("Podlaží"), Some(&FieldValue::Integer(2)));
    assert_eq!(record.get("Obytná plocha"), Some(&FieldValue::Float(48.0)));
    assert_eq!(record.get("Dispozice"), Some(&FieldValue::Text("2+1".into())));
    assert_eq!(record.get("typ"), Some(&FieldValue::Text("Byt".into())));
}

#[test]
fn odd_top_level_shapes_degrade_to_absent_fields() {
    let p = payload(json!({
        "name": { "value": 7 },
        "items": { "Podlaží": "3. podlaží" },
        "seo": { "category_main_cb": "1" },
    }));

    let record = normalize_detail(&p, seed()).unwrap();

    assert_eq!(record, seed());
}

#[test]
fn repeated_attribute_keeps_first_value() {
    let p = payload(json!({
        "items": [
            { "name": "Stavba", "value": "Panelová" },
            { "name": "Stavba", "value": "Cihlová" },
        ],
    }));

    let record = normalize_detail(&p, seed()).unwrap();

    assert_eq!(record.get("Stavba"), Some(&FieldValue::Text("Panelová".into())));
}
