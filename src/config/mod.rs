//! Run configuration for the linkback engine.
//!
//! A [`Config`] is built once by the host build pipeline and passed
//! explicitly to every entry point; nothing in this crate keeps a shared
//! default instance around between runs.

use std::path::PathBuf;
use std::time::Duration;

/// Default User-Agent, kept identical to the original plugin for
/// receiver-side log continuity.
pub const DEFAULT_USER_AGENT: &str = "pelican-plugin-linkbacks";

/// Default cache file name inside the site cache directory.
pub const CACHE_FILENAME: &str = "pelican-plugin-linkbacks.json";

const DEFAULT_TIMEOUT_SECS: u64 = 3;
const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Immutable per-run settings, sourced from the site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Site base URL; links starting with this prefix are internal and
    /// never notified. Empty disables the internal-link filter.
    pub site_url: String,
    /// User-Agent sent on every fetch and notification request.
    pub user_agent: String,
    /// Where the link cache is persisted between runs.
    pub cache_path: PathBuf,
    /// Per-request timeout for fetches and notifications.
    pub timeout: Duration,
    /// Whether TLS certificates are verified. Leave on outside of tests.
    pub verify_tls: bool,
    /// Fetches abort once the response body reaches this many bytes.
    pub max_response_bytes: usize,
}

impl Config {
    /// Configuration for a site rooted at `site_url`, everything else at
    /// the defaults.
    pub fn for_site(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_path: PathBuf::from("cache").join(CACHE_FILENAME),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_conventions() {
        let cfg = Config::default();
        assert_eq!(cfg.user_agent, "pelican-plugin-linkbacks");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert!(cfg.verify_tls);
        assert_eq!(cfg.max_response_bytes, 1024 * 1024);
        assert!(cfg.cache_path.ends_with(CACHE_FILENAME));
    }

    #[test]
    fn for_site_overrides_only_the_base_url() {
        let cfg = Config::for_site("https://blog.example.com/");
        assert_eq!(cfg.site_url, "https://blog.example.com/");
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }
}
