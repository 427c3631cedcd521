use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod sentiment;

pub use catalog::{CatalogMovie, CatalogPage, DiscoverQuery, MovieMetadata, SortOrder};
pub use sentiment::SentimentLabel;

/// Review submitted for analysis
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub movie_name: String,
    #[serde(default)]
    pub review_text: String,
}

impl SentimentRequest {
    /// Both fields must carry non-whitespace text
    pub fn is_complete(&self) -> bool {
        !self.movie_name.trim().is_empty() && !self.review_text.trim().is_empty()
    }
}

/// Movie recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecommendation {
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Full poster URL. Serialized under the historical `poster_path` key.
    #[serde(rename = "poster_path")]
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
}

/// Sentiment verdict plus recommendations for the reviewed movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentResponse {
    pub sentiment: SentimentLabel,
    /// Currently always equal to `confidence`
    pub sentiment_score: f64,
    pub confidence: f64,
    pub original_review_text: String,
    pub reviewed_movie_title: String,
    pub recommendations: Vec<MovieRecommendation>,
}
