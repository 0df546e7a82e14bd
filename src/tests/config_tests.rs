use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::errors::CrawlError;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, CrawlError> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let config = from_pairs(&[]).unwrap();

    assert_eq!(config.api_base, "https://www.sreality.cz/api");
    assert_eq!(config.per_page, 999);
    assert_eq!(config.workers, 4);
    assert_eq!(config.fetch_settings().request_delay, Duration::from_millis(100));
    assert_eq!(config.db_path, "flats.sqlite3");
    assert!(config.jsonl_path.is_none());
    assert!(config.max_runtime().is_none());
}

#[test]
fn overrides_are_parsed() {
    let config = from_pairs(&[
        ("FLATS_PER_PAGE", "60"),
        ("FLATS_WORKERS", "8"),
        ("FLATS_REQUEST_DELAY_MS", "250"),
        ("FLATS_MAX_RUNTIME_SECS", "3600"),
        ("FLATS_JSONL_PATH", "out.jsonl"),
        ("FLATS_XLSX_PATH", "  "),
    ])
    .unwrap();

    assert_eq!(config.crawl_settings().per_page, 60);
    assert_eq!(config.crawl_settings().workers, 8);
    assert_eq!(config.fetch_settings().request_delay, Duration::from_millis(250));
    assert_eq!(config.max_runtime(), Some(Duration::from_secs(3600)));
    assert_eq!(config.jsonl_path.as_deref(), Some("out.jsonl"));
    assert!(config.xlsx_path.is_none());
}

#[test]
fn invalid_number_is_a_config_error() {
    let err = from_pairs(&[("FLATS_WORKERS", "many")]).unwrap_err();

    assert!(matches!(err, CrawlError::Config(ref msg) if msg.contains("FLATS_WORKERS")));
}
