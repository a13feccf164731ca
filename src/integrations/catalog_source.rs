// src/integrations/catalog_source.rs
//
// Remote catalog contract
//
// Every call fails with a transport/API error on network failure or a
// non-2xx response. Retries, if any, belong to the implementation.

use async_trait::async_trait;

use crate::domain::{Credits, MovieDetails, TimeWindow, TrendingPage};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One page of trending movies for `window` (pages start at 1)
    async fn get_trending(&self, window: TimeWindow, page: u32) -> AppResult<TrendingPage>;

    async fn get_details(&self, movie_id: i64) -> AppResult<MovieDetails>;

    async fn get_credits(&self, movie_id: i64) -> AppResult<Credits>;
}
