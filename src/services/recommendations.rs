use std::sync::Arc;

use crate::{
    models::{CatalogMovie, CatalogPage, DiscoverQuery, MovieMetadata, SentimentLabel, SortOrder},
    services::providers::CatalogProvider,
};

/// Maximum recommendations returned for a review
pub const RECOMMENDATION_LIMIT: usize = 8;

const MIN_VOTES_ENGLISH: u32 = 1000;
const MIN_VOTES_OTHER: u32 = 50;

/// Minimum vote count for genre discovery
///
/// Non-English titles accumulate far fewer votes, so the threshold drops for them.
pub fn min_vote_count(metadata: &MovieMetadata) -> u32 {
    if metadata.is_english() {
        MIN_VOTES_ENGLISH
    } else {
        MIN_VOTES_OTHER
    }
}

/// Discovery query for the reviewed movie's genres and language
pub fn genre_discovery(metadata: &MovieMetadata, sort_by: SortOrder) -> DiscoverQuery {
    DiscoverQuery {
        with_genres: Some(metadata.genre_filter()),
        with_original_language: Some(metadata.original_language.clone()),
        sort_by,
        min_vote_count: Some(min_vote_count(metadata)),
    }
}

fn take_page(page: Option<CatalogPage>) -> Vec<CatalogMovie> {
    page.map(|p| p.take(RECOMMENDATION_LIMIT)).unwrap_or_default()
}

fn non_empty(page: Option<CatalogPage>) -> Option<Vec<CatalogMovie>> {
    page.filter(|p| !p.results.is_empty())
        .map(|p| p.take(RECOMMENDATION_LIMIT))
}

/// Generates recommendations from the review sentiment and the reviewed movie's metadata
///
/// Fallback chain:
/// 1. Unknown movie: top-rated for positive reviews, popular otherwise.
/// 2. Positive or neutral: direct recommendations, then similar titles, then genre
///    discovery by popularity.
/// 3. Negative: genre discovery by average rating.
///
/// The chain runs as its own task; if it panics the generic popular listing is served.
pub async fn recommend(
    provider: Arc<dyn CatalogProvider>,
    sentiment: SentimentLabel,
    metadata: Option<MovieMetadata>,
) -> Vec<CatalogMovie> {
    let chain_provider = provider.clone();
    let chain = tokio::spawn(async move {
        fallback_chain(chain_provider.as_ref(), sentiment, metadata.as_ref()).await
    });

    match chain.await {
        Ok(movies) => movies,
        Err(e) => {
            tracing::error!(error = %e, "Recommendation chain failed, serving popular titles");
            take_page(provider.popular().await)
        }
    }
}

async fn fallback_chain(
    provider: &dyn CatalogProvider,
    sentiment: SentimentLabel,
    metadata: Option<&MovieMetadata>,
) -> Vec<CatalogMovie> {
    let Some(metadata) = metadata else {
        tracing::info!(
            sentiment = %sentiment,
            "Movie metadata not found, using generic listing"
        );
        return if sentiment.is_positive() {
            take_page(provider.top_rated().await)
        } else {
            take_page(provider.popular().await)
        };
    };

    tracing::info!(
        sentiment = %sentiment,
        movie_id = metadata.id,
        genres = %metadata.genre_filter(),
        language = %metadata.original_language,
        min_votes = min_vote_count(metadata),
        "Selecting recommendation strategy"
    );

    if sentiment.is_negative() {
        tracing::info!(movie_id = metadata.id, "Negative review, finding top rated in genre");
        let query = genre_discovery(metadata, SortOrder::VoteAverageDesc);
        return take_page(provider.discover_movies(&query).await);
    }

    if let Some(movies) = non_empty(provider.movie_recommendations(metadata.id).await) {
        tracing::info!(movie_id = metadata.id, "Using direct recommendations");
        return movies;
    }

    if let Some(movies) = non_empty(provider.similar_movies(metadata.id).await) {
        tracing::info!(movie_id = metadata.id, "Direct recommendations empty, using similar titles");
        return movies;
    }

    tracing::info!(movie_id = metadata.id, "Similar titles empty, falling back to genre discovery");
    let query = genre_discovery(metadata, SortOrder::PopularityDesc);
    take_page(provider.discover_movies(&query).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockCatalogProvider;
    use mockall::predicate::eq;

    fn movies(ids: std::ops::Range<i64>) -> Option<CatalogPage> {
        Some(CatalogPage {
            results: ids
                .map(|id| CatalogMovie {
                    id: Some(id),
                    ..Default::default()
                })
                .collect(),
        })
    }

    fn empty() -> Option<CatalogPage> {
        Some(CatalogPage::default())
    }

    fn sci_fi(language: &str) -> MovieMetadata {
        MovieMetadata {
            id: 27205,
            genre_ids: vec![28, 878],
            original_language: language.to_string(),
            title: Some("Inception".to_string()),
        }
    }

    fn ids(movies: &[CatalogMovie]) -> Vec<i64> {
        movies.iter().filter_map(|m| m.id).collect()
    }

    #[test]
    fn test_min_vote_count_adapts_to_language() {
        assert_eq!(min_vote_count(&sci_fi("en")), 1000);
        assert_eq!(min_vote_count(&sci_fi("hi")), 50);
    }

    #[test]
    fn test_genre_discovery_query() {
        let query = genre_discovery(&sci_fi("fr"), SortOrder::VoteAverageDesc);
        assert_eq!(query.with_genres.as_deref(), Some("28|878"));
        assert_eq!(query.with_original_language.as_deref(), Some("fr"));
        assert_eq!(query.sort_by, SortOrder::VoteAverageDesc);
        assert_eq!(query.min_vote_count, Some(50));
    }

    #[tokio::test]
    async fn test_positive_uses_direct_recommendations_only() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_movie_recommendations()
            .with(eq(27205))
            .times(1)
            .returning(|_| movies(100..120));
        provider.expect_similar_movies().never();
        provider.expect_discover_movies().never();

        let result = recommend(
            Arc::new(provider),
            SentimentLabel::Positive,
            Some(sci_fi("en")),
        )
        .await;

        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        assert_eq!(ids(&result), (100..108).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_falls_back_to_similar() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_movie_recommendations()
            .times(1)
            .returning(|_| empty());
        provider
            .expect_similar_movies()
            .with(eq(27205))
            .times(1)
            .returning(|_| movies(200..203));
        provider.expect_discover_movies().never();

        let result = recommend(
            Arc::new(provider),
            SentimentLabel::Neutral,
            Some(sci_fi("en")),
        )
        .await;

        assert_eq!(ids(&result), vec![200, 201, 202]);
    }

    #[tokio::test]
    async fn test_falls_back_to_popular_genre_discovery() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_movie_recommendations()
            .times(1)
            .returning(|_| None);
        provider.expect_similar_movies().times(1).returning(|_| empty());
        provider
            .expect_discover_movies()
            .withf(|q| {
                q.sort_by == SortOrder::PopularityDesc
                    && q.with_genres.as_deref() == Some("28|878")
                    && q.with_original_language.as_deref() == Some("ja")
                    && q.min_vote_count == Some(50)
            })
            .times(1)
            .returning(|_| movies(300..330));

        let result = recommend(
            Arc::new(provider),
            SentimentLabel::SomewhatPositive,
            Some(sci_fi("ja")),
        )
        .await;

        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        assert_eq!(result[0].id, Some(300));
    }

    #[tokio::test]
    async fn test_negative_skips_to_top_rated_discovery() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_movie_recommendations().never();
        provider.expect_similar_movies().never();
        provider
            .expect_discover_movies()
            .withf(|q| q.sort_by == SortOrder::VoteAverageDesc && q.min_vote_count == Some(1000))
            .times(1)
            .returning(|_| movies(400..405));

        let result = recommend(
            Arc::new(provider),
            SentimentLabel::SomewhatNegative,
            Some(sci_fi("en")),
        )
        .await;

        assert_eq!(ids(&result), vec![400, 401, 402, 403, 404]);
    }

    #[tokio::test]
    async fn test_failed_discovery_is_empty() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_movies().times(1).returning(|_| None);
        provider.expect_popular().never();

        let result = recommend(
            Arc::new(provider),
            SentimentLabel::Negative,
            Some(sci_fi("en")),
        )
        .await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_movie_positive_uses_top_rated() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_top_rated().times(1).returning(|| movies(1..21));
        provider.expect_popular().never();

        let result = recommend(Arc::new(provider), SentimentLabel::Positive, None).await;
        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
    }

    #[tokio::test]
    async fn test_unknown_movie_negative_uses_popular() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_popular().times(1).returning(|| movies(1..4));
        provider.expect_top_rated().never();

        let result = recommend(Arc::new(provider), SentimentLabel::Negative, None).await;
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_movie_neutral_uses_popular() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_popular().times(1).returning(|| movies(1..2));
        provider.expect_top_rated().never();

        let result = recommend(Arc::new(provider), SentimentLabel::Neutral, None).await;
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_movie_with_catalog_down() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_top_rated().returning(|| None);

        let result = recommend(Arc::new(provider), SentimentLabel::Positive, None).await;
        assert!(result.is_empty());
    }

    /// Catalog whose recommendation lookup panics
    struct PanickingCatalog {
        popular_calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for PanickingCatalog {
        async fn search_movies(&self, _query: &str) -> Option<CatalogPage> {
            None
        }

        async fn movie_recommendations(&self, _movie_id: i64) -> Option<CatalogPage> {
            panic!("catalog client blew up")
        }

        async fn similar_movies(&self, _movie_id: i64) -> Option<CatalogPage> {
            None
        }

        async fn discover_movies(&self, _query: &DiscoverQuery) -> Option<CatalogPage> {
            None
        }

        async fn trending_week(&self) -> Option<CatalogPage> {
            None
        }

        async fn top_rated(&self) -> Option<CatalogPage> {
            None
        }

        async fn popular(&self) -> Option<CatalogPage> {
            self.popular_calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            movies(900..920)
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_panicking_chain_serves_popular() {
        let provider = Arc::new(PanickingCatalog {
            popular_calls: Default::default(),
        });

        let result = recommend(
            provider.clone(),
            SentimentLabel::Positive,
            Some(sci_fi("en")),
        )
        .await;

        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        assert_eq!(result[0].id, Some(900));
        assert_eq!(
            provider
                .popular_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }
}
