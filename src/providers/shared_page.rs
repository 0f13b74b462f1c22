//! Providers whose catalog page lists every product type

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ScreeningProvider;
use crate::extractors::extract_page;
use crate::fetch::DocumentFetcher;
use crate::model::{Product, ProductType, ProviderInfo};
use crate::rules::RuleTable;

/// Fetches `ProviderInfo::url` once and runs every requested rule over it
pub struct SharedPageProvider {
    fetcher: Arc<dyn DocumentFetcher>,
    rules: RuleTable,
}

impl SharedPageProvider {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, rules: RuleTable) -> Self {
        Self { fetcher, rules }
    }
}

#[async_trait]
impl ScreeningProvider for SharedPageProvider {
    fn rules(&self) -> &RuleTable {
        &self.rules
    }

    async fn screening(&self, info: &ProviderInfo, types: &[ProductType]) -> Vec<Product> {
        let rules = self.rules.resolve(types);
        if rules.is_empty() {
            debug!(provider = %info.title, "no rules for requested types");
            return Vec::new();
        }

        let page = match self.fetcher.fetch(&info.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(provider = %info.title, url = %info.url, "page fetch failed: {}", e);
                return Vec::new();
            }
        };

        extract_page(&page.body, &rules)
    }
}
