//! Provider adapters
//!
//! An adapter knows which page(s) to fetch for a provider and which rules to
//! run over them. Retailers differ only in configuration, so there is one
//! adapter per way of reaching the items:
//!
//! - [`SharedPageProvider`]: one catalog page lists every product type
//! - [`QueryPageProvider`]: one search page per product type

mod query_page;
mod shared_page;

pub use query_page::QueryPageProvider;
pub use shared_page::SharedPageProvider;

use async_trait::async_trait;

use crate::model::{Product, ProductType, ProviderInfo};
use crate::rules::RuleTable;

/// Screens one retailer into product records
#[async_trait]
pub trait ScreeningProvider: Send + Sync {
    /// Product types this provider can screen
    fn rules(&self) -> &RuleTable;

    /// Products for the requested types. Types without a rule contribute
    /// nothing; fetch and item failures are logged and contribute nothing.
    async fn screening(&self, info: &ProviderInfo, types: &[ProductType]) -> Vec<Product>;
}
