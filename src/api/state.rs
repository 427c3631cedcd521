use std::sync::Arc;

use crate::services::{CatalogProvider, SentimentClassifier};

/// Shared application state
///
/// Everything here is initialized once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub classifier: Arc<SentimentClassifier>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, classifier: SentimentClassifier) -> Self {
        Self {
            catalog,
            classifier: Arc::new(classifier),
        }
    }
}
