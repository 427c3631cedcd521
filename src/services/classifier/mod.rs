//! Sentiment classifier adapter
//!
//! Wraps a trained linear text classifier and its paired TF-IDF vectorizer, both loaded
//! once at startup from JSON artifacts. When either artifact is unavailable the adapter
//! runs in degraded mode and every prediction is `(Neutral, 0.5)`.

use std::path::Path;

use crate::models::SentimentLabel;

pub mod model;
pub mod vectorizer;

pub use model::{ConfidenceSource, LinearModel};
pub use vectorizer::TfidfVectorizer;

/// Confidence reported when no better estimate exists
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("inconsistent model artifacts: {0}")]
    Shape(String),
}

#[derive(Debug)]
struct Pipeline {
    vectorizer: TfidfVectorizer,
    model: LinearModel,
}

#[derive(Debug)]
pub struct SentimentClassifier {
    pipeline: Option<Pipeline>,
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: display,
        source,
    })
}

impl SentimentClassifier {
    /// Classifier without a model; always answers `(Neutral, 0.5)`
    pub fn degraded() -> Self {
        Self { pipeline: None }
    }

    /// Builds a classifier from already-deserialized artifacts
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: LinearModel,
    ) -> Result<Self, ModelError> {
        vectorizer.validate()?;
        model.validate(vectorizer.n_features())?;

        Ok(Self {
            pipeline: Some(Pipeline { vectorizer, model }),
        })
    }

    pub fn try_load(
        model_path: impl AsRef<Path>,
        vectorizer_path: impl AsRef<Path>,
    ) -> Result<Self, ModelError> {
        let model: LinearModel = read_artifact(model_path.as_ref())?;
        let vectorizer: TfidfVectorizer = read_artifact(vectorizer_path.as_ref())?;
        Self::from_parts(vectorizer, model)
    }

    /// Loads the artifacts, falling back to degraded mode on any failure
    pub fn load(model_path: impl AsRef<Path>, vectorizer_path: impl AsRef<Path>) -> Self {
        match Self::try_load(model_path, vectorizer_path) {
            Ok(classifier) => {
                tracing::info!(
                    confidence_source = ?classifier
                        .pipeline
                        .as_ref()
                        .map(|p| p.model.confidence_source()),
                    "Sentiment model and vectorizer loaded"
                );
                classifier
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load sentiment model, running degraded");
                Self::degraded()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Predicts a sentiment label and a confidence in [0, 1]
    pub fn classify(&self, text: &str) -> (SentimentLabel, f64) {
        let Some(pipeline) = &self.pipeline else {
            return (SentimentLabel::Neutral, DEFAULT_CONFIDENCE);
        };

        let x = pipeline.vectorizer.transform(text);
        let label = SentimentLabel::from_class(pipeline.model.predict(&x))
            .unwrap_or(SentimentLabel::Neutral);
        let confidence = pipeline.model.confidence(&x);

        (label, confidence)
    }
}
