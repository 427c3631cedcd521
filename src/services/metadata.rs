use crate::{models::MovieMetadata, services::providers::CatalogProvider};

const DEFAULT_LANGUAGE: &str = "en";

/// Resolves a free-text movie name to catalog metadata
///
/// Takes the provider's top-ranked search hit as-is. Returns `None` when the search failed,
/// came back empty, or the top hit has no id.
pub async fn resolve(provider: &dyn CatalogProvider, movie_name: &str) -> Option<MovieMetadata> {
    let page = provider.search_movies(movie_name).await?;
    let top = page.results.into_iter().next()?;

    let Some(id) = top.id else {
        tracing::warn!(movie_name = %movie_name, "Top search result has no id");
        return None;
    };

    let metadata = MovieMetadata {
        id,
        genre_ids: top.genre_ids.unwrap_or_default(),
        original_language: top
            .original_language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        title: top.title,
    };

    tracing::debug!(
        movie_name = %movie_name,
        movie_id = metadata.id,
        genres = ?metadata.genre_ids,
        language = %metadata.original_language,
        "Resolved movie metadata"
    );

    Some(metadata)
}
