//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mdt_client::ClientConfig;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Browser cookie header used to authenticate against the API proxy.
    pub cookie: Option<String>,

    /// Anti-forgery token matching the cookie session.
    pub xsrf_token: Option<String>,

    /// Base URL of the timeline API.
    pub base_url: Option<String>,

    /// Total attempts per request.
    pub retries: u32,

    /// Seconds to pause between attempts.
    pub retry_backoff_secs: u64,

    /// Seconds before a single request times out.
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("xsrf_token", &self.xsrf_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("retries", &self.retries)
            .field("retry_backoff_secs", &self.retry_backoff_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            cookie: None,
            xsrf_token: None,
            base_url: None,
            retries: client.retries,
            retry_backoff_secs: client.backoff.as_secs(),
            request_timeout_secs: client.timeout.as_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MDT_*)
        figment = figment.merge(Env::prefixed("MDT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for mdt.
///
/// On Linux: `~/.config/mdt`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mdt"))
}
