//! Screening orchestration
//!
//! A [`Screener`] owns every registered provider. One provider run is
//! sequential; different providers share nothing and are screened
//! concurrently, their products tagged with the provider title.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info};

use crate::config::ScreenerConfig;
use crate::error::{ConfigError, SinkError};
use crate::model::{Product, ProductType, ProviderInfo, ProviderScreening, Screening};
use crate::providers::ScreeningProvider;

/// Receives finished screenings (storage, reports, notifications)
#[async_trait]
pub trait ScreeningSink: Send + Sync {
    async fn record(&self, screening: &Screening) -> Result<(), SinkError>;
}

/// A provider adapter together with the target it screens
#[derive(Clone)]
pub struct ProviderHandle {
    pub info: ProviderInfo,
    provider: Arc<dyn ScreeningProvider>,
}

impl ProviderHandle {
    pub fn new(info: ProviderInfo, provider: Arc<dyn ScreeningProvider>) -> Self {
        Self { info, provider }
    }

    pub fn provider(&self) -> &dyn ScreeningProvider {
        self.provider.as_ref()
    }

    /// Every product type this provider has a rule for
    pub async fn screen_all(&self) -> Vec<Product> {
        self.screening(&ProductType::ALL).await
    }

    pub async fn screen_one(&self, product_type: ProductType) -> Vec<Product> {
        self.screening(&[product_type]).await
    }

    pub async fn screening(&self, types: &[ProductType]) -> Vec<Product> {
        let rules = self.provider.rules();
        let known: Vec<ProductType> = types.iter().copied().filter(|t| rules.contains(*t)).collect();
        if known.len() < types.len() {
            debug!(
                provider = %self.info.title,
                dropped = types.len() - known.len(),
                "skipping product types without rules"
            );
        }

        info!(provider = %self.info.title, types = known.len(), "screening started");
        let products = if known.is_empty() {
            Vec::new()
        } else {
            self.provider.screening(&self.info, &known).await
        };
        info!(provider = %self.info.title, products = products.len(), "screening finished");

        products
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("info", &self.info)
            .field("types", &self.provider.rules().len())
            .finish()
    }
}

/// Screens all registered providers
#[derive(Debug, Clone, Default)]
pub struct Screener {
    providers: Vec<ProviderHandle>,
}

impl Screener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured provider with its own HTTP fetcher
    pub fn from_config(config: &ScreenerConfig) -> Result<Self, ConfigError> {
        let mut screener = Self::new();
        for provider in &config.providers {
            screener = screener.with_provider(provider.info.clone(), provider.build()?);
        }
        Ok(screener)
    }

    pub fn with_provider(mut self, info: ProviderInfo, provider: Arc<dyn ScreeningProvider>) -> Self {
        self.providers.push(ProviderHandle::new(info, provider));
        self
    }

    pub fn providers(&self) -> &[ProviderHandle] {
        &self.providers
    }

    pub fn provider(&self, title: &str) -> Option<&ProviderHandle> {
        self.providers.iter().find(|p| p.info.title == title)
    }

    /// Screen every provider concurrently. Results keep registration order.
    pub async fn screen_providers(&self, types: &[ProductType]) -> Screening {
        let fetched_at = Utc::now();

        let results = join_all(self.providers.iter().map(|handle| async move {
            ProviderScreening {
                provider: handle.info.title.clone(),
                products: handle.screening(types).await,
            }
        }))
        .await;

        let screening = Screening { fetched_at, results };
        info!(
            providers = self.providers.len(),
            products = screening.len(),
            "screening run finished"
        );
        screening
    }

    /// Screen every provider and hand the result to `sink`
    pub async fn run(&self, types: &[ProductType], sink: &dyn ScreeningSink) -> Result<Screening, SinkError> {
        let screening = self.screen_providers(types).await;
        sink.record(&screening).await?;
        Ok(screening)
    }
}
