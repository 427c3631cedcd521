//! Movie catalog provider abstraction
//!
//! The recommendation pipeline only talks to the catalog through this trait, which keeps
//! the fallback logic testable without network access. Implementations absorb every
//! transport failure: `None` means "no data", whatever the reason.

use crate::models::{CatalogPage, DiscoverQuery};

pub mod tmdb;

pub use tmdb::{RetryPolicy, TmdbProvider};

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Free-text title search, best match first
    async fn search_movies(&self, query: &str) -> Option<CatalogPage>;

    /// Provider-curated recommendations for a movie
    async fn movie_recommendations(&self, movie_id: i64) -> Option<CatalogPage>;

    /// Movies similar to the given one
    async fn similar_movies(&self, movie_id: i64) -> Option<CatalogPage>;

    /// Filtered discovery listing
    async fn discover_movies(&self, query: &DiscoverQuery) -> Option<CatalogPage>;

    /// Trending this week
    async fn trending_week(&self) -> Option<CatalogPage>;

    /// Global top-rated listing
    async fn top_rated(&self) -> Option<CatalogPage>;

    /// Generic popular listing
    async fn popular(&self) -> Option<CatalogPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
