use serde::{Deserialize, Serialize};

// ============================================================================
// TMDB payload types
// ============================================================================

/// One page of a TMDB listing (search, discover, trending, ...)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<CatalogMovie>,
}

impl CatalogPage {
    /// First `limit` records of the page
    pub fn take(self, limit: usize) -> Vec<CatalogMovie> {
        self.results.into_iter().take(limit).collect()
    }
}

/// Raw movie record as returned by TMDB. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub original_language: Option<String>,
}

/// Context about the reviewed movie, resolved per request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub id: i64,
    pub genre_ids: Vec<i64>,
    /// ISO 639-1 code
    pub original_language: String,
    pub title: Option<String>,
}

impl MovieMetadata {
    /// Genre tags OR-combined for a discover query
    pub fn genre_filter(&self) -> String {
        self.genre_ids
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn is_english(&self) -> bool {
        self.original_language == "en"
    }
}

// ============================================================================
// Discover queries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PopularityDesc,
    VoteAverageDesc,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
        }
    }
}

/// Filter set for TMDB's /discover/movie
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub with_genres: Option<String>,
    pub with_original_language: Option<String>,
    pub sort_by: SortOrder,
    pub min_vote_count: Option<u32>,
}

const ANIMATION_GENRE_ID: &str = "16";

impl DiscoverQuery {
    /// Animated titles, most popular first
    pub fn animated() -> Self {
        Self {
            with_genres: Some(ANIMATION_GENRE_ID.to_string()),
            with_original_language: None,
            sort_by: SortOrder::PopularityDesc,
            min_vote_count: None,
        }
    }

    /// Query parameters in TMDB's naming, empty filters omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(genres) = self.with_genres.as_ref().filter(|g| !g.is_empty()) {
            params.push(("with_genres", genres.clone()));
        }
        if let Some(lang) = self
            .with_original_language
            .as_ref()
            .filter(|l| !l.is_empty())
        {
            params.push(("with_original_language", lang.clone()));
        }
        params.push(("sort_by", self.sort_by.as_param().to_string()));
        if let Some(min_votes) = self.min_vote_count {
            params.push(("vote_count.gte", min_votes.to_string()));
        }
        params.push(("page", "1".to_string()));

        params
    }
}
