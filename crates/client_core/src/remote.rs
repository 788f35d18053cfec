//! Access to the OMDb-style metadata provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    codec::{decode_search_reply, decode_title_reply, ProviderReply},
    domain::{Movie, SearchItem},
    error::DecodeError,
};
use tracing::{info, warn};
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only lookups against the metadata provider. Implementations never
/// retry; callers decide whether to ask again.
#[async_trait]
pub trait MovieRemoteSource: Send + Sync {
    async fn fetch_by_title(&self, title: &str) -> Result<Movie, FetchError>;
    async fn search_by_term(&self, term: &str) -> Result<Vec<SearchItem>, FetchError>;
}

/// Stand-in used when no api key is configured.
pub struct MissingRemoteSource;

#[async_trait]
impl MovieRemoteSource for MissingRemoteSource {
    async fn fetch_by_title(&self, _title: &str) -> Result<Movie, FetchError> {
        Err(FetchError::provider("no OMDb api key configured"))
    }

    async fn search_by_term(&self, _term: &str) -> Result<Vec<SearchItem>, FetchError> {
        Err(FetchError::provider("no OMDb api key configured"))
    }
}

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)?;
        // No idle pooling: every lookup opens its own connection and the
        // connection is gone once the response has been consumed or dropped.
        let http = Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    fn request_url(&self, param: &str, value: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(param, value)
            .append_pair("apikey", &self.api_key);
        url
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, String), FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl MovieRemoteSource for OmdbClient {
    async fn fetch_by_title(&self, title: &str) -> Result<Movie, FetchError> {
        let (status, body) = self.get(self.request_url("t", title)).await?;
        let movie = settle(status, decode_title_reply(&body))
            .inspect_err(|error| warn!(%title, %error, "title lookup failed"))?;
        info!(%title, imdb_id = %movie.imdb_id, "title lookup succeeded");
        Ok(movie)
    }

    async fn search_by_term(&self, term: &str) -> Result<Vec<SearchItem>, FetchError> {
        let (status, body) = self.get(self.request_url("s", term)).await?;
        let items = settle(status, decode_search_reply(&body))
            .inspect_err(|error| warn!(%term, %error, "search failed"))?;
        info!(%term, count = items.len(), "search succeeded");
        Ok(items)
    }
}

/// A provider rejection wins over the HTTP status so that messages such as
/// "Invalid API key!" sent with a 401 still reach the user.
fn settle<T>(
    status: StatusCode,
    decoded: Result<ProviderReply<T>, DecodeError>,
) -> Result<T, FetchError> {
    match decoded {
        Ok(ProviderReply::Rejected(message)) => Err(FetchError::Provider { message }),
        _ if !status.is_success() => Err(FetchError::Status(status.as_u16())),
        Ok(ProviderReply::Found(value)) => Ok(value),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
