//! TMDB (The Movie Database) provider
//!
//! Every call carries the API key, a default locale, a fixed user agent and a 10 second
//! timeout. Transient failures are retried with exponential backoff; anything that still
//! fails is logged and reported as `None`.
//!
//! Endpoints consumed:
//! - /search/movie
//! - /movie/{id}/recommendations, /movie/{id}/similar
//! - /discover/movie
//! - /trending/movie/week, /movie/top_rated, /movie/popular

use crate::{
    models::{CatalogPage, DiscoverQuery},
    services::providers::CatalogProvider,
};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = "MovieSentimentAPI/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry schedule for idempotent catalog reads
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt; doubled for each further attempt
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the given (1-based) failed attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        RETRY_STATUSES.contains(&status.as_u16())
    }

    fn is_retryable_error(&self, error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("TMDB returned status {0}")]
    Status(StatusCode),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    language: String,
    retry: RetryPolicy,
}

impl TmdbProvider {
    /// Creates a provider with the default retry policy
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        language: String,
    ) -> reqwest::Result<Self> {
        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generic TMDB GET
    ///
    /// Injects `api_key` and, unless the caller already set one, `language`. Returns the
    /// decoded body, or `None` when no key is configured or the call failed for any reason.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Option<T> {
        let api_key = self.api_key.as_ref()?;

        params.push(("api_key", api_key.clone()));
        if !params.iter().any(|(key, _)| *key == "language") {
            params.push(("language", self.language.clone()));
        }

        let url = format!("{}{}", self.api_url, endpoint);

        match self.fetch(&url, &params).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    error = %e,
                    provider = "tmdb",
                    "TMDB API call failed"
                );
                None
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let response = self.get_with_retry(url, params).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_with_retry(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response, FetchError> {
        let mut attempt = 1;

        loop {
            let result = self.http_client.get(url).query(params).send().await;

            let retryable = match &result {
                Ok(response) => self.retry.is_retryable_status(response.status()),
                Err(e) => self.retry.is_retryable_error(e),
            };

            if retryable && attempt < self.retry.max_attempts {
                let wait = self.retry.backoff(attempt);
                tracing::debug!(
                    url = %url,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Transient TMDB failure, backing off"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            let response = result?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status()));
            }

            return Ok(response);
        }
    }
}

fn first_page() -> Vec<(&'static str, String)> {
    vec![("page", "1".to_string())]
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> Option<CatalogPage> {
        self.call("/search/movie", vec![("query", query.to_string())])
            .await
    }

    async fn movie_recommendations(&self, movie_id: i64) -> Option<CatalogPage> {
        self.call(&format!("/movie/{}/recommendations", movie_id), first_page())
            .await
    }

    async fn similar_movies(&self, movie_id: i64) -> Option<CatalogPage> {
        self.call(&format!("/movie/{}/similar", movie_id), first_page())
            .await
    }

    async fn discover_movies(&self, query: &DiscoverQuery) -> Option<CatalogPage> {
        self.call("/discover/movie", query.to_params()).await
    }

    async fn trending_week(&self) -> Option<CatalogPage> {
        self.call("/trending/movie/week", Vec::new()).await
    }

    async fn top_rated(&self) -> Option<CatalogPage> {
        self.call("/movie/top_rated", first_page()).await
    }

    async fn popular(&self) -> Option<CatalogPage> {
        self.call("/movie/popular", first_page()).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
