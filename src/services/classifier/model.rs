use serde::Deserialize;

use super::{vectorizer::SparseVector, ModelError, DEFAULT_CONFIDENCE};

/// Which confidence capability the trained model exposes. Fixed at load time.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// Unbounded per-class margins (e.g. a linear SVM)
    #[default]
    DecisionFunction,
    /// Posterior probability estimates (e.g. logistic regression)
    PredictProba,
    /// Class predictions only
    PredictOnly,
}

/// Raw decision output: one score for binary models, one per class otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionScores {
    Scalar(f64),
    PerClass(Vec<f64>),
}

impl DecisionScores {
    pub fn max(&self) -> f64 {
        match self {
            DecisionScores::Scalar(score) => *score,
            DecisionScores::PerClass(scores) => {
                scores.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }
        }
    }
}

/// Squashes an unbounded margin into (0.5, 1.0)
pub fn margin_confidence(score: f64) -> f64 {
    1.0 / (1.0 + (-score.abs()).exp())
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Linear text classifier: `scores = coef · x + intercept`
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    output: ConfidenceSource,
}

impl LinearModel {
    pub fn confidence_source(&self) -> ConfidenceSource {
        self.output
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1 && self.classes.len() == 2
    }

    /// Checks the weights against each other and the vectorizer's column count
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::Shape(format!(
                "expected at least 2 classes, got {}",
                self.classes.len()
            )));
        }

        if !self.is_binary() && self.coef.len() != self.classes.len() {
            return Err(ModelError::Shape(format!(
                "{} coef rows for {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }

        if self.intercept.len() != self.coef.len() {
            return Err(ModelError::Shape(format!(
                "{} intercepts for {} coef rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }

        if let Some(row) = self.coef.iter().find(|row| row.len() != n_features) {
            return Err(ModelError::Shape(format!(
                "coef row has {} columns, vectorizer produces {}",
                row.len(),
                n_features
            )));
        }

        Ok(())
    }

    pub fn decision_function(&self, x: &SparseVector) -> DecisionScores {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect();

        if self.is_binary() {
            DecisionScores::Scalar(scores[0])
        } else {
            DecisionScores::PerClass(scores)
        }
    }

    /// Predicted class label
    pub fn predict(&self, x: &SparseVector) -> i64 {
        match self.decision_function(x) {
            DecisionScores::Scalar(score) => {
                if score > 0.0 {
                    self.classes[1]
                } else {
                    self.classes[0]
                }
            }
            DecisionScores::PerClass(scores) => {
                let best = scores
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, s)| {
                        if *s > best.1 {
                            (i, *s)
                        } else {
                            best
                        }
                    })
                    .0;
                self.classes[best]
            }
        }
    }

    /// Posterior estimates, in `classes` order
    pub fn predict_proba(&self, x: &SparseVector) -> Vec<f64> {
        match self.decision_function(x) {
            DecisionScores::Scalar(score) => {
                let p = sigmoid(score);
                vec![1.0 - p, p]
            }
            DecisionScores::PerClass(scores) => softmax(&scores),
        }
    }

    /// Confidence in [0, 1] from whichever capability the model exposes
    pub fn confidence(&self, x: &SparseVector) -> f64 {
        let confidence = match self.output {
            ConfidenceSource::DecisionFunction => margin_confidence(self.decision_function(x).max()),
            ConfidenceSource::PredictProba => self
                .predict_proba(x)
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max),
            ConfidenceSource::PredictOnly => DEFAULT_CONFIDENCE,
        };

        if confidence.is_nan() {
            return DEFAULT_CONFIDENCE;
        }
        confidence.clamp(0.0, 1.0)
    }
}
