use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral sentiment score used when no news is available.
pub const NEUTRAL_SENTIMENT_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Negative => write!(f, "Negative"),
        }
    }
}

impl SentimentLabel {
    /// Classify a 0-100 sentiment score.
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            Self::Positive
        } else if score >= 40.0 {
            Self::Neutral
        } else {
            Self::Negative
        }
    }
}

/// A news headline attached to a company, optionally scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Polarity in [-1, 1]; `None` until analyzed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            published: None,
            link: None,
            sentiment: None,
        }
    }
}

/// Aggregated news sentiment for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSentiment {
    /// 0-100, 50 is neutral
    pub score: f64,
    pub label: SentimentLabel,
    pub news_count: usize,
    pub recent_news: Vec<NewsItem>,
}

impl Default for NewsSentiment {
    fn default() -> Self {
        Self {
            score: NEUTRAL_SENTIMENT_SCORE,
            label: SentimentLabel::Neutral,
            news_count: 0,
            recent_news: Vec::new(),
        }
    }
}
