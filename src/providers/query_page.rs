//! Providers searched once per product type

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::ScreeningProvider;
use crate::extractors::extract_page;
use crate::fetch::DocumentFetcher;
use crate::model::{Product, ProductType, ProviderInfo};
use crate::rules::RuleTable;

/// Placeholder in `query_path` replaced by the rule's encoded query
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Fetches `ProviderInfo::url` + `query_path` for each requested type
pub struct QueryPageProvider {
    fetcher: Arc<dyn DocumentFetcher>,
    query_path: String,
    rules: RuleTable,
}

impl QueryPageProvider {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, query_path: impl Into<String>, rules: RuleTable) -> Self {
        Self {
            fetcher,
            query_path: query_path.into(),
            rules,
        }
    }

    /// Search URL for one query, e.g. `http://shop.test/search/?text=iphone+SE`
    pub fn query_url(&self, base_url: &str, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            self.query_path.replace(QUERY_PLACEHOLDER, &encoded)
        )
    }
}

#[async_trait]
impl ScreeningProvider for QueryPageProvider {
    fn rules(&self) -> &RuleTable {
        &self.rules
    }

    async fn screening(&self, info: &ProviderInfo, types: &[ProductType]) -> Vec<Product> {
        let mut products = Vec::new();

        for rule in self.rules.resolve(types) {
            let product_type = rule.product_type();
            let Some(query) = rule.rule.query.as_deref() else {
                warn!(provider = %info.title, ?product_type, "rule has no search query");
                continue;
            };

            let url = self.query_url(&info.url, query);
            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(provider = %info.title, ?product_type, %url, "page fetch failed: {}", e);
                    continue;
                }
            };

            let found = extract_page(&page.body, &[rule]);
            debug!(provider = %info.title, ?product_type, count = found.len(), "query page screened");
            products.extend(found);
        }

        products
    }
}
