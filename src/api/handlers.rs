use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{DiscoverQuery, MovieRecommendation, SentimentRequest, SentimentResponse},
    services::{formatter::format_recommendations, metadata, recommendations},
};

use super::AppState;

/// Cap for the trending and discover listings
pub const LISTING_LIMIT: usize = 15;
/// Cap for title search results
pub const SEARCH_LIMIT: usize = 8;
/// Shorter queries are answered with an empty list
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Liveness probe, reporting whether the classifier is loaded
pub async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.classifier.is_loaded()
    }))
}

/// Classify a review and recommend movies for the reviewed title
pub async fn predict_locale(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> AppResult<Json<SentimentResponse>> {
    let Json(request) = payload?;
    if !request.is_complete() {
        return Err(AppError::InvalidInput("Missing inputs".to_string()));
    }

    let movie_metadata = metadata::resolve(state.catalog.as_ref(), &request.movie_name).await;

    let classifier = state.classifier.clone();
    let review = request.review_text.clone();
    let (sentiment, confidence) =
        run_blocking(&request_id, move || classifier.classify(&review)).await?;

    let raw = recommendations::recommend(state.catalog.clone(), sentiment, movie_metadata.clone())
        .await;
    let recommendations = format_recommendations(raw);

    let reviewed_movie_title = movie_metadata
        .and_then(|m| m.title)
        .unwrap_or_else(|| request.movie_name.clone());

    tracing::info!(
        request_id = %request_id,
        movie = %reviewed_movie_title,
        sentiment = %sentiment,
        confidence,
        recommendations = recommendations.len(),
        "Review analyzed"
    );

    Ok(Json(SentimentResponse {
        sentiment,
        sentiment_score: confidence,
        confidence,
        original_review_text: request.review_text,
        reviewed_movie_title,
        recommendations,
    }))
}

/// Runs CPU-bound work on the blocking pool. A panic in `work` becomes a 500.
async fn run_blocking<F, T>(request_id: &RequestId, work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Blocking task failed");
        AppError::Internal(e.to_string())
    })
}

/// Movies trending this week
pub async fn trending(State(state): State<AppState>) -> Json<Vec<MovieRecommendation>> {
    let movies = state
        .catalog
        .trending_week()
        .await
        .map(|page| page.take(LISTING_LIMIT))
        .unwrap_or_default();
    Json(format_recommendations(movies))
}

/// Popular movies, or popular animated movies for `type=animated`
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Json<Vec<MovieRecommendation>> {
    let page = match params.kind.as_deref() {
        Some("animated") => {
            state
                .catalog
                .discover_movies(&DiscoverQuery::animated())
                .await
        }
        _ => state.catalog.popular().await,
    };

    let movies = page
        .map(|page| page.take(LISTING_LIMIT))
        .unwrap_or_default();
    Json(format_recommendations(movies))
}

/// Title search proxy
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<MovieRecommendation>> {
    if params.query.chars().count() < MIN_SEARCH_QUERY_CHARS {
        return Json(Vec::new());
    }

    let movies = state
        .catalog
        .search_movies(&params.query)
        .await
        .map(|page| page.take(SEARCH_LIMIT))
        .unwrap_or_default();
    Json(format_recommendations(movies))
}
