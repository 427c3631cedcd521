use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::{borrow::Cow, collections::HashMap};

use super::ModelError;

// Unicode \w includes combining marks, so decomposed accents and Indic viramas stay in-word
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern"));

/// Sparse feature vector, entries sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense row. Columns past the row's end count as zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(col, value)| dense.get(*col).map(|w| w * value))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// TF-IDF text vectorizer
///
/// Tokens are runs of two or more word characters. N-grams in `ngram_range` are joined with
/// a single space and looked up in `vocabulary`; unknown terms are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    norm: Norm,
}

impl TfidfVectorizer {
    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        match &self.idf {
            Some(idf) => idf.len(),
            None => self
                .vocabulary
                .values()
                .max()
                .map(|max| max + 1)
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Shape(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        if self.vocabulary.is_empty() {
            return Err(ModelError::Shape("empty vocabulary".to_string()));
        }

        let n_features = self.n_features();
        if let Some((term, col)) = self.vocabulary.iter().find(|(_, col)| **col >= n_features) {
            return Err(ModelError::Shape(format!(
                "term '{}' maps to column {} but idf has {} entries",
                term, col, n_features
            )));
        }

        Ok(())
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(col) = self.vocabulary.get(&term) {
                    *counts.entry(*col).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let idf = self
                    .idf
                    .as_ref()
                    .and_then(|idf| idf.get(col))
                    .copied()
                    .unwrap_or(1.0);
                (col, tf * idf)
            })
            .collect();
        entries.sort_by_key(|(col, _)| *col);

        if self.norm == Norm::L2 {
            let length = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                entries.iter_mut().for_each(|(_, v)| *v /= length);
            }
        }

        SparseVector { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vectorizer(value: serde_json::Value) -> TfidfVectorizer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unigram_counts_without_norm() {
        let v = vectorizer(json!({
            "vocabulary": {"loved": 0, "it": 1, "boring": 2},
            "norm": "none"
        }));

        let x = v.transform("Loved it. LOVED it!");
        assert_eq!(x.entries(), &[(0, 2.0), (1, 2.0)]);
    }

    #[test]
    fn test_single_char_tokens_dropped() {
        let v = vectorizer(json!({
            "vocabulary": {"a": 0, "film": 1},
            "norm": "none"
        }));

        let x = v.transform("a film");
        assert_eq!(x.entries(), &[(1, 1.0)]);
    }

    #[test]
    fn test_combining_marks_stay_in_word() {
        let v = vectorizer(json!({
            "vocabulary": {"nai\u{308}ve": 0, "नमस्ते": 1},
            "norm": "none"
        }));

        assert_eq!(v.transform("So nai\u{308}ve.").entries(), &[(0, 1.0)]);
        assert_eq!(v.transform("नमस्ते!").entries(), &[(1, 1.0)]);
    }

    #[test]
    fn test_superscript_digits_are_not_word_chars() {
        let v = vectorizer(json!({
            "vocabulary": {"x²": 0, "mc²": 1, "mc": 2},
            "norm": "none"
        }));

        assert_eq!(v.transform("x² mc²").entries(), &[(2, 1.0)]);
    }

    #[test]
    fn test_bigrams() {
        let v = vectorizer(json!({
            "vocabulary": {"not": 0, "good": 1, "not good": 2},
            "ngram_range": [1, 2],
            "norm": "none"
        }));

        let x = v.transform("not good");
        assert_eq!(x.entries(), &[(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_idf_and_l2_norm() {
        let v = vectorizer(json!({
            "vocabulary": {"great": 0, "movie": 1},
            "idf": [3.0, 4.0]
        }));

        let x = v.transform("great movie");
        let entries = x.entries();
        assert!((entries[0].1 - 0.6).abs() < 1e-9);
        assert!((entries[1].1 - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_sublinear_tf() {
        let v = vectorizer(json!({
            "vocabulary": {"wow": 0},
            "sublinear_tf": true,
            "norm": "none"
        }));

        let x = v.transform("wow wow wow");
        assert!((x.entries()[0].1 - (1.0 + 3f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_text_is_empty() {
        let v = vectorizer(json!({"vocabulary": {"great": 0}}));
        assert!(v.transform("zzz qqq").is_empty());
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn test_case_preserved_when_not_lowercasing() {
        let v = vectorizer(json!({
            "vocabulary": {"Great": 0},
            "lowercase": false,
            "norm": "none"
        }));
        assert_eq!(v.transform("Great great").entries(), &[(0, 1.0)]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_column() {
        let v = vectorizer(json!({
            "vocabulary": {"great": 0, "movie": 5},
            "idf": [1.0, 1.0]
        }));
        assert!(matches!(v.validate(), Err(ModelError::Shape(_))));
    }

    #[test]
    fn test_validate_rejects_bad_ngram_range() {
        let v = vectorizer(json!({
            "vocabulary": {"great": 0},
            "ngram_range": [2, 1]
        }));
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_sparse_dot() {
        let v = vectorizer(json!({
            "vocabulary": {"great": 0, "movie": 2},
            "norm": "none"
        }));
        let x = v.transform("great movie");
        assert_eq!(x.dot(&[2.0, 100.0, -1.0]), 1.0);
        assert_eq!(x.dot(&[2.0]), 2.0);
    }
}
