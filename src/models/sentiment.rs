use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Five-point ordinal sentiment scale produced by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SentimentLabel {
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Somewhat Negative")]
    SomewhatNegative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Somewhat Positive")]
    SomewhatPositive,
    #[serde(rename = "Positive")]
    Positive,
}

impl SentimentLabel {
    /// Maps a classifier class index (0-4) onto the scale
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(SentimentLabel::Negative),
            1 => Some(SentimentLabel::SomewhatNegative),
            2 => Some(SentimentLabel::Neutral),
            3 => Some(SentimentLabel::SomewhatPositive),
            4 => Some(SentimentLabel::Positive),
            _ => None,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(
            self,
            SentimentLabel::Positive | SentimentLabel::SomewhatPositive
        )
    }

    pub fn is_negative(self) -> bool {
        matches!(
            self,
            SentimentLabel::Negative | SentimentLabel::SomewhatNegative
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::SomewhatNegative => "Somewhat Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::SomewhatPositive => "Somewhat Positive",
            SentimentLabel::Positive => "Positive",
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
