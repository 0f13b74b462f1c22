//! Retailer price screening
//!
//! Reduces structurally different retailer catalog pages to one flat list of
//! normalized [`Product`] observations:
//! - per-provider rule tables (CSS selectors + title patterns)
//! - extraction from inline node text or JSON data attributes
//! - price parsing where a missing price is a value, not an error
//! - failure isolation per item, per product type and per provider

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod patterns;
pub mod providers;
pub mod rules;
pub mod screener;

pub use config::{Navigation, ProviderConfig, ScreenerConfig};
pub use error::{ConfigError, FetchError, ItemError, RuleError, SinkError};
pub use fetch::{DocumentFetcher, FetcherConfig, HttpFetcher, Page};
pub use model::{Product, ProductType, ProviderInfo, ProviderScreening, Screening};
pub use providers::{QueryPageProvider, ScreeningProvider, SharedPageProvider};
pub use rules::{CaptureLayout, CompiledRule, ItemSource, ProductTypeRule, RuleTable, TitleText};
pub use screener::{ProviderHandle, Screener, ScreeningSink};
