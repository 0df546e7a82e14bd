// src/domain/tables.rs

//! Read-only lookup tables for the targeted marketplace.

/// A geographic region the crawl is partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub code: u8,
    pub name: &'static str,
}

pub const REGIONS: [Region; 14] = [
    Region { code: 1, name: "Jihočeský kraj" },
    Region { code: 2, name: "Plzeňský kraj" },
    Region { code: 3, name: "Karlovarský kraj" },
    Region { code: 4, name: "Ústecký kraj" },
    Region { code: 5, name: "Liberecký kraj" },
    Region { code: 6, name: "Královéhradecký kraj" },
    Region { code: 7, name: "Pardubický kraj" },
    Region { code: 8, name: "Olomoucký kraj" },
    Region { code: 9, name: "Zlínský kraj" },
    Region { code: 10, name: "Praha" },
    Region { code: 11, name: "Středočeský kraj" },
    Region { code: 12, name: "Moravskoslezský kraj" },
    Region { code: 13, name: "Vysočina" },
    Region { code: 14, name: "Jihomoravský kraj" },
];

const PRICE_KINDS: [(&str, &str); 2] = [("Celková cena", "total"), ("za m²", "per_m2")];

const UNIT_TYPES: [(i64, &str); 1] = [(1, "Byt")];

pub fn region_by_code(code: u8) -> Option<Region> {
    REGIONS.iter().copied().find(|r| r.code == code)
}

/// Maps the marketplace's price label to our short price-kind code.
pub fn price_kind_code(label: &str) -> Option<&'static str> {
    PRICE_KINDS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, code)| *code)
}

/// Maps the detail payload's `category_main_cb` to a unit-type label.
pub fn unit_type_label(code: i64) -> Option<&'static str> {
    UNIT_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

// Record field names written by the pipeline itself.
pub const FIELD_REGION: &str = "region";
pub const FIELD_PRICE: &str = "Cena";
pub const FIELD_PRICE_KIND: &str = "Typ_ceny";
pub const FIELD_API_DETAIL: &str = "api_detail";
pub const FIELD_DISPOSITION: &str = "Dispozice";
pub const FIELD_UNIT_TYPE: &str = "typ";
