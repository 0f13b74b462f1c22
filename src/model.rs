//! Catalog types shared by every provider

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog variant tracked across retailers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    IphoneSe,
    Iphone6s,
    Iphone7,
    Iphone7Plus,
    Iphone8,
    Iphone8Plus,
    IphoneX,
    IphoneXs,
    IphoneXsMax,
    IphoneXr,
}

impl ProductType {
    pub const ALL: [ProductType; 10] = [
        ProductType::IphoneSe,
        ProductType::Iphone6s,
        ProductType::Iphone7,
        ProductType::Iphone7Plus,
        ProductType::Iphone8,
        ProductType::Iphone8Plus,
        ProductType::IphoneX,
        ProductType::IphoneXs,
        ProductType::IphoneXsMax,
        ProductType::IphoneXr,
    ];
}

/// One scrape target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub title: String,
    pub url: String,
}

impl ProviderInfo {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A current price observation for one item on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    /// `None` when no price node on the item parsed as a number
    pub price: Option<Decimal>,
    pub product_type: ProductType,
    /// Canonical `key=value;...` form, see [`crate::patterns::params_to_string`]
    pub parameters: String,
}

/// Products observed for one provider during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderScreening {
    pub provider: String,
    pub products: Vec<Product>,
}

/// Result of screening every registered provider once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screening {
    pub fetched_at: DateTime<Utc>,
    pub results: Vec<ProviderScreening>,
}

impl Screening {
    /// All products across providers, in provider registration order
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.results.iter().flat_map(|r| r.products.iter())
    }

    pub fn len(&self) -> usize {
        self.results.iter().map(|r| r.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
