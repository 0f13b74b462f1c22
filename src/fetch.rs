//! Fetching retailer pages

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, FetchError};

static SCRIPT_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>")
        .expect("script block regex")
});

/// A fetched HTML document, not yet parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub body: String,
}

/// Retrieves one URL as an HTML page
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// HTTP settings for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent with every request; some retailers pick the region from these
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Keep `<script>`/`<style>` blocks in fetched pages
    #[serde(default)]
    pub scripts_enabled: bool,
}

fn default_user_agent() -> String {
    concat!("price_screener/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            headers: BTreeMap::new(),
            scripts_enabled: false,
        }
    }
}

impl FetcherConfig {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// reqwest-backed fetcher; one per provider so headers never leak across
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    scripts_enabled: bool,
}

impl HttpFetcher {
    /// `provider` only labels construction errors
    pub fn new(provider: &str, config: &FetcherConfig) -> Result<Self, ConfigError> {
        let client_error = |reason: String| ConfigError::Client {
            provider: provider.to_string(),
            reason,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| client_error(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| client_error(format!("header value '{value}': {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| client_error(e.to_string()))?;

        Ok(Self {
            client,
            scripts_enabled: config.scripts_enabled,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        debug!(url, "fetching page");

        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(FetchError::NotFound {
                    url: url.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
            _ => {}
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Malformed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let body = if self.scripts_enabled {
            body
        } else {
            strip_scripts(&body)
        };

        debug!(url, bytes = body.len(), "page fetched");
        Ok(Page {
            url: url.to_string(),
            body,
        })
    }
}

/// Remove script, style and noscript blocks so their text never reaches
/// item extraction
pub fn strip_scripts(html: &str) -> String {
    SCRIPT_BLOCKS.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_scripts() {
        let html = r#"<li>iPhone SE<script type="text/javascript">var price = 1;</script><STYLE>li{}</STYLE><span>19 990</span></li>"#;
        assert_eq!(strip_scripts(html), "<li>iPhone SE<span>19 990</span></li>");
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: FetcherConfig = serde_json::from_str(r#"{"headers": {"_space": "spb_cl%3A"}}"#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.scripts_enabled);
        assert_eq!(config.headers.get("_space").map(String::as_str), Some("spb_cl%3A"));
        assert!(config.user_agent.starts_with("price_screener/"));
    }

    #[test]
    fn test_http_fetcher_rejects_bad_header() {
        let config = FetcherConfig::default().header("bad header", "x");
        let err = HttpFetcher::new("Citilink", &config).unwrap_err();
        assert!(matches!(err, ConfigError::Client { ref provider, .. } if provider == "Citilink"));

        let config = FetcherConfig::default().header("_space", "spb_cl%3A");
        assert!(HttpFetcher::new("Citilink", &config).is_ok());
    }
}
