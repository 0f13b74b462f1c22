//! Error types for screening
//!
//! Fetch and item errors are recovered inside a screening run and only
//! surface in logs. Rule and config errors are returned at construction.

use thiserror::Error;

use crate::model::ProductType;

/// A single document fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unreadable body from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// One candidate node could not be turned into a product
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("'{text}' does not match /{pattern}/")]
    PatternMismatch { text: String, pattern: String },

    #[error("cannot decode item payload '{payload}': {source}")]
    Decode {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("item payload has no '{field}': {payload}")]
    MissingField { field: String, payload: String },
}

/// A product-type rule is misconfigured
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid selector '{selector}' for {product_type:?}: {reason}")]
    InvalidSelector {
        product_type: ProductType,
        selector: String,
        reason: String,
    },

    #[error("invalid title pattern for {product_type:?}: {source}")]
    InvalidPattern {
        product_type: ProductType,
        #[source]
        source: regex::Error,
    },

    #[error("capture {index} used for {field} but /{pattern}/ declares {declared} groups")]
    CaptureOutOfRange {
        field: &'static str,
        index: usize,
        declared: usize,
        pattern: String,
    },

    #[error("duplicate rule for {0:?}")]
    Duplicate(ProductType),
}

/// Loading or building screening configuration failed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider '{provider}': {source}")]
    Rule {
        provider: String,
        #[source]
        source: RuleError,
    },

    #[error("provider '{provider}': invalid URL '{url}': {source}")]
    InvalidUrl {
        provider: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("provider '{provider}': cannot build HTTP client: {reason}")]
    Client { provider: String, reason: String },
}

/// The screening sink could not accept a run
#[derive(Debug, Error)]
#[error("screening sink failed: {0}")]
pub struct SinkError(#[source] pub Box<dyn std::error::Error + Send + Sync>);
