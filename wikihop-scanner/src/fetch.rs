use crate::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Retrieves the body of a page by identifier.
///
/// Called concurrently from every fetch worker.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, page: &str) -> Result<String>;
}

/// Fetches pages over HTTP relative to a site root such as
/// `https://en.wikipedia.org`.
pub struct HttpFetcher {
    client: Client,
    site: Url,
}

impl HttpFetcher {
    pub fn new(site: &str) -> Result<Self> {
        Self::with_timeout(site, 10)
    }

    pub fn with_timeout(site: &str, timeout_secs: u64) -> Result<Self> {
        let site = Url::parse(site)
            .map_err(|e| SearchError::InvalidUrl(format!("{}: {}", site, e)))?;
        if site.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl(format!("{} cannot be a base URL", site)));
        }

        let client = Client::builder()
            .user_agent(concat!("wikihop/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, site })
    }

    /// Absolute URL for a page identifier.
    pub fn page_url(&self, page: &str) -> Result<Url> {
        self.site
            .join(page)
            .map_err(|e| SearchError::InvalidPage(format!("{}: {}", page, e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, page: &str) -> Result<String> {
        let url = self.page_url(page)?;
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
