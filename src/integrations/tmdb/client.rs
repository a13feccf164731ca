// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Handles authentication, timeouts, error bodies
// - Maps wire payloads → domain DTOs (no persistence, no caching)
// - Used by CatalogService through the CatalogSource trait
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never touches the local store
// - Every failure is returned, never swallowed here

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::domain::{Credits, MovieDetails, TimeWindow, TrendingPage};
use crate::error::{AppError, AppResult};
use crate::integrations::catalog_source::CatalogSource;

/// TMDB error body, e.g. `{"status_code": 7, "status_message": "Invalid API key"}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status_message: Option<String>,
}

/// TMDB API Client
pub struct TmdbClient {
    base_url: Url,
    http_client: Client,
    api_token: Option<String>,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            AppError::Other(format!("Invalid API base URL {}: {}", config.api_base_url, e))
        })?;

        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url,
            http_client,
            api_token: config.api_token.clone(),
            language: config.language.clone(),
        })
    }

    /// Trending listing for a window, e.g. `trending/movie/day?page=2`
    fn trending_url(&self, window: TimeWindow, page: u32) -> AppResult<Url> {
        let mut url = self.endpoint(&format!("trending/movie/{}", window.token()))?;
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("page", &page.max(1).to_string());
        Ok(url)
    }

    fn details_url(&self, movie_id: i64) -> AppResult<Url> {
        let mut url = self.endpoint(&format!("movie/{}", movie_id))?;
        url.query_pairs_mut().append_pair("language", &self.language);
        Ok(url)
    }

    fn credits_url(&self, movie_id: i64) -> AppResult<Url> {
        self.endpoint(&format!("movie/{}/credits", movie_id))
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Other(format!("Invalid endpoint {}: {}", path, e)))
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    async fn get_json<T>(&self, url: Url) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        log::debug!("GET {}", url.path());

        let mut request = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), status.canonical_reason(), &body));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Build an API error from a non-2xx response body
fn api_error(status: u16, reason: Option<&str>, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string());

    AppError::Api { status, message }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn get_trending(&self, window: TimeWindow, page: u32) -> AppResult<TrendingPage> {
        let mut response: TrendingPage = self.get_json(self.trending_url(window, page)?).await?;
        response.total_pages = response.total_pages.max(1);
        Ok(response)
    }

    async fn get_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        self.get_json(self.details_url(movie_id)?).await
    }

    async fn get_credits(&self, movie_id: i64) -> AppResult<Credits> {
        self.get_json(self.credits_url(movie_id)?).await
    }
}
