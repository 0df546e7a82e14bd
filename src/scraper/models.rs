use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// search response
//  ├── result_size
//  ├── per_page
//  ├── page
//  └── _embedded
//       └── estates[]
//            ├── price_czk
//            │    ├── value_raw
//            │    └── name
//            └── _links
//                 └── self
//                      └── href
//
// detail response
//  ├── name
//  │    └── value
//  ├── items[]
//  │    ├── name
//  │    └── value
//  └── seo
//       └── category_main_cb

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_embedded", default, deserialize_with = "lenient")]
    pub embedded: Option<Embedded>,
    #[serde(default, deserialize_with = "lenient")]
    pub result_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub per_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Embedded {
    /// Kept raw so one odd entry cannot spoil the rest of the page.
    #[serde(default, deserialize_with = "array_or_empty")]
    pub estates: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EstateEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub price_czk: Option<PriceCzk>,
    #[serde(rename = "_links", default, deserialize_with = "lenient")]
    pub links: Option<Links>,
}

#[derive(Debug, Deserialize)]
pub struct PriceCzk {
    #[serde(default, deserialize_with = "lenient")]
    pub value_raw: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, deserialize_with = "lenient")]
    pub self_link: Option<Href>,
}

#[derive(Debug, Deserialize)]
pub struct Href {
    #[serde(default, deserialize_with = "lenient")]
    pub href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<DisplayName>,
    #[serde(default, deserialize_with = "detail_items")]
    pub items: Vec<DetailItem>,
    #[serde(default, deserialize_with = "lenient")]
    pub seo: Option<Seo>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayName {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailItem {
    pub name: String,
    #[serde(default)]
    pub value: AttributeValue,
}

#[derive(Debug, Deserialize)]
pub struct Seo {
    #[serde(default, deserialize_with = "lenient")]
    pub category_main_cb: Option<i64>,
}

/// Decodes `T` if the value has the expected shape, otherwise treats it as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn array_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

// Items without a string name are skipped, the rest are kept.
fn detail_items<'de, D>(deserializer: D) -> Result<Vec<DetailItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = array_or_empty(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// The representation an attribute value arrived in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::Other(Value::Null)
    }
}

impl DetailPayload {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_ref().and_then(|n| n.value.as_deref())
    }

    pub fn category_code(&self) -> Option<i64> {
        self.seo.as_ref().and_then(|s| s.category_main_cb)
    }
}

impl EstateEntry {
    pub fn detail_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.self_link.as_ref())
            .and_then(|s| s.href.as_deref())
            .filter(|h| !h.is_empty())
    }
}
