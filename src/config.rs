//! Screening configuration
//!
//! Providers, their HTTP settings and rule tables are plain serde data, so a
//! deployment can describe retailers in JSON:
//!
//! ```json
//! {
//!   "providers": [{
//!     "info": { "title": "CitilinkSpb", "url": "http://citilink.ru" },
//!     "navigation": { "kind": "query_page", "query_path": "/search/?text={query}" },
//!     "fetcher": { "headers": { "_space": "spb_cl%3A" } },
//!     "rules": [ ... ]
//!   }]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fetch::{DocumentFetcher, FetcherConfig, HttpFetcher};
use crate::model::ProviderInfo;
use crate::providers::{QueryPageProvider, ScreeningProvider, SharedPageProvider};
use crate::rules::{ProductTypeRule, RuleTable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenerConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// How a provider's items are reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    SharedPage,
    /// `query_path` is appended to the provider URL with `{query}` replaced
    QueryPage { query_path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub info: ProviderInfo,
    pub navigation: Navigation,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub rules: Vec<ProductTypeRule>,
}

impl ScreenerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl ProviderConfig {
    /// Compile rules and build the adapter with an HTTP fetcher
    pub fn build(&self) -> Result<Arc<dyn ScreeningProvider>, ConfigError> {
        let fetcher = HttpFetcher::new(&self.info.title, &self.fetcher)?;
        self.build_with_fetcher(Arc::new(fetcher))
    }

    /// Compile rules and build the adapter around a given fetcher
    pub fn build_with_fetcher(
        &self,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Result<Arc<dyn ScreeningProvider>, ConfigError> {
        url::Url::parse(&self.info.url).map_err(|source| ConfigError::InvalidUrl {
            provider: self.info.title.clone(),
            url: self.info.url.clone(),
            source,
        })?;

        let rules = RuleTable::new(self.rules.iter().cloned()).map_err(|source| ConfigError::Rule {
            provider: self.info.title.clone(),
            source,
        })?;

        let provider: Arc<dyn ScreeningProvider> = match &self.navigation {
            Navigation::SharedPage => Arc::new(SharedPageProvider::new(fetcher, rules)),
            Navigation::QueryPage { query_path } => {
                Arc::new(QueryPageProvider::new(fetcher, query_path.clone(), rules))
            }
        };
        Ok(provider)
    }
}
