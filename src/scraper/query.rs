// query.rs
use url::Url;

use crate::errors::CrawlError;

pub const DEFAULT_API_BASE: &str = "https://www.sreality.cz/api";

/// Large enough that most regions come back in a single page.
pub const DEFAULT_PER_PAGE: u64 = 999;

const SEARCH_PATH: &str = "/cs/v2/estates";

// Flats for sale, excluding auctions, in any of the listed building conditions.
const FIXED_FILTERS: [(&str, &str); 5] = [
    ("building_condition", "1|2|3|8|9"),
    ("category_main_cb", "1"),
    ("category_sub_cb", "2|3|4|5|6|7|8|9|10|11|12"),
    ("category_type_cb", "1"),
    ("no_auction", "1"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    pub region_id: u8,
    pub per_page: u64,
    pub page: u64,
}

impl SearchQuery {
    pub fn first_page(region_id: u8, per_page: u64) -> Self {
        Self {
            region_id,
            per_page,
            page: 1,
        }
    }

    pub fn with_page(self, page: u64) -> Self {
        Self { page, ..self }
    }

    pub fn to_url(&self, api_base: &str) -> Result<Url, CrawlError> {
        let mut url = Url::parse(&format!("{}{}", api_base.trim_end_matches('/'), SEARCH_PATH))
            .map_err(|e| CrawlError::Config(format!("Invalid API base {api_base:?}: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in FIXED_FILTERS {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("locality_region_id", &self.region_id.to_string());
            pairs.append_pair("per_page", &self.per_page.to_string());
            pairs.append_pair("page", &self.page.to_string());
        }

        Ok(url)
    }
}

/// Detail links in search results are relative to the API root.
pub fn detail_url(api_base: &str, href: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), href)
}
