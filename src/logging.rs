//! Logging setup for binaries and tests embedding the screener

use tracing_subscriber::{fmt, EnvFilter};

/// Install a console subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// HTTP internals stay at `warn`. Returns `false` when a global subscriber
/// was already installed.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));
    fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "warn,price_screener={level},reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_mentions_crate() {
        let filter = default_filter("debug");
        assert!(filter.to_string().contains("price_screener=debug"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging("info");
        assert!(!init_logging("debug"));
    }
}
