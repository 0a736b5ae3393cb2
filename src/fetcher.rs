use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://som.yale.edu/faculty-research/faculty-directory";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Http { status: StatusCode, url: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Anything that can turn a slug into a profile page body.
pub trait ProfileSource: Send + Sync + 'static {
    fn fetch(&self, slug: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub fn profile_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// Plain GET against the faculty directory. No auth, no extra headers.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// `timeout: None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
        })
    }
}

impl ProfileSource for HttpFetcher {
    async fn fetch(&self, slug: &str) -> Result<String, FetchError> {
        let url = profile_url(&self.base_url, slug);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Http { status, url });
        }
        Ok(response.text().await?)
    }
}
