use crate::models::{CatalogMovie, MovieRecommendation};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const UNKNOWN_TITLE: &str = "Unknown";

/// Maps raw catalog records into the public recommendation shape. Never fails.
pub fn format_recommendations(movies: Vec<CatalogMovie>) -> Vec<MovieRecommendation> {
    movies.into_iter().map(MovieRecommendation::from).collect()
}

impl From<CatalogMovie> for MovieRecommendation {
    fn from(movie: CatalogMovie) -> Self {
        let poster_url = movie
            .poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", IMAGE_BASE_URL, path));

        MovieRecommendation {
            id: movie.id.unwrap_or(0),
            title: movie.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            overview: movie.overview.unwrap_or_default(),
            poster_url,
            release_date: Some(movie.release_date.unwrap_or_default()),
            vote_average: movie.vote_average.unwrap_or(0.0),
        }
    }
}
