//! Request decoration, retry, and page fetching.

use mdt_core::Page;
use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use url::Url;

use crate::Error;
use crate::client::Client;

/// Anti-forgery header expected by the security portal.
const HEADER_XSRF: &str = "X-XSRF-TOKEN";
/// User agent advertised on every request.
const MDT_USER_AGENT: &str = concat!("mdt/", env!("CARGO_PKG_VERSION"));

impl Client {
    /// Decorates a GET request with the headers every timeline call
    /// carries. The anti-forgery token is attached only to requests
    /// targeting the proxy host, retried or not.
    fn request(&self, url: Url) -> RequestBuilder {
        let proxy_host = url.host_str() == self.base.host_str()
            && url.port_or_known_default() == self.base.port_or_known_default();

        let mut builder = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-us")
            .header(USER_AGENT, MDT_USER_AGENT);
        if proxy_host {
            builder = builder.header(HEADER_XSRF, self.xsrf.clone());
        }
        builder
    }

    /// Sends the request, retrying transport-level failures up to the
    /// configured attempt count with a pause between attempts.
    ///
    /// A completed HTTP exchange is returned whatever its status;
    /// only connection errors and timeouts are retried.
    async fn send_with_retry(&self, url: &Url) -> Result<reqwest::Response, Error> {
        let mut attempt = 1;
        loop {
            match self.request(url.clone()).send().await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.retries => {
                    tracing::warn!(attempt, retries = self.retries, error = %err, "retrying request");
                    attempt += 1;
                    tokio::time::sleep(self.backoff).await;
                }
                Err(err) => {
                    return Err(Error::Transport {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    /// Fetches and decodes one timeline page.
    pub(crate) async fn fetch_page(&self, url: &Url) -> Result<Page, Error> {
        tracing::debug!(%url, "fetching timeline page");
        let response = self.send_with_retry(url).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.text().await {
                Ok(body) => body,
                Err(err) => err.to_string(),
            };
            return Err(Error::Status { status, detail });
        }

        let body = response.text().await.map_err(Error::Body)?;
        Ok(serde_json::from_str(&body)?)
    }
}
