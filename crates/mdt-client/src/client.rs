//! Client construction and configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::HeaderValue;
use url::Url;

use crate::Error;
use crate::cookies;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default total attempts per request.
const DEFAULT_RETRIES: u32 = 3;
/// Default pause between attempts.
const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);
/// The timeline API behind the security-portal proxy.
const DEFAULT_BASE_URL: &str =
    "https://security.microsoft.com/apiproxy/mtp/mdeTimelineExperience";

/// Tuning knobs for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the timeline API. `None` targets the production
    /// security portal.
    pub base_url: Option<Url>,
    /// Total attempts per request; only transport-level failures are
    /// retried. Normalized to at least 1.
    pub retries: u32,
    /// Pause between attempts.
    pub backoff: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authenticated HTTP client for the timeline API.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone
/// shares the underlying HTTP connection pool and cookie store.
#[derive(Clone)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) base: Url,
    pub(crate) xsrf: HeaderValue,
    pub(crate) retries: u32,
    pub(crate) backoff: Duration,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base.as_str())
            .field("xsrf", &"[REDACTED]")
            .field("retries", &self.retries)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client from a raw cookie header and anti-forgery
    /// token, with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie header carries no usable pair,
    /// the token is empty or not a valid header value, or the HTTP
    /// client fails to build.
    pub fn new(cookie: &str, xsrf: &str) -> Result<Self, Error> {
        Self::with_config(cookie, xsrf, ClientConfig::default())
    }

    /// Creates a client with explicit settings.
    ///
    /// # Errors
    ///
    /// As [`Client::new`], plus an error when the configured base URL
    /// cannot serve as one.
    pub fn with_config(cookie: &str, xsrf: &str, config: ClientConfig) -> Result<Self, Error> {
        // Validate the anti-forgery token
        if xsrf.is_empty() {
            return Err(Error::InvalidToken {
                reason: "token cannot be empty",
            });
        }
        if xsrf.trim().is_empty() {
            return Err(Error::InvalidToken {
                reason: "token cannot be whitespace-only",
            });
        }
        let xsrf = HeaderValue::from_str(xsrf).map_err(|_| Error::InvalidToken {
            reason: "token is not a valid header value",
        })?;

        let base = resolve_base(config.base_url)?;

        // Scope the session cookies to the proxy host
        let jar = Arc::new(Jar::default());
        for pair in cookies::parse(cookie)? {
            jar.add_cookie_str(&pair, &base);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_provider(jar)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self {
            http,
            base,
            xsrf,
            retries: config.retries.max(1),
            backoff: config.backoff,
        })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

fn resolve_base(base_url: Option<Url>) -> Result<Url, Error> {
    let base = match base_url {
        Some(url) => url,
        None => Url::parse(DEFAULT_BASE_URL).map_err(|err| Error::BaseUrl {
            reason: err.to_string(),
        })?,
    };
    if base.cannot_be_a_base() {
        return Err(Error::BaseUrl {
            reason: "URL cannot serve as a base".to_string(),
        });
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(Error::BaseUrl {
            reason: "base URL must not carry a query or fragment".to_string(),
        });
    }
    Ok(base)
}
