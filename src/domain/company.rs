use crate::domain::sentiment::{NewsItem, NewsSentiment, SentimentLabel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Display name used when a company carries no name.
pub const DEFAULT_COMPANY_NAME: &str = "Company";

/// Raw company data as delivered by a data source.
///
/// Metrics are kept as loosely-typed JSON values keyed by name: a value that is
/// absent, null, non-numeric or non-finite reads back as missing. Descriptive
/// fields are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyData {
    #[serde(default, rename = "company_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_label: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsItem>,
    #[serde(flatten)]
    pub metrics: HashMap<String, Value>,
}

impl CompanyData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.set_metric(name, value);
        self
    }

    /// Store a numeric metric. NaN and infinities are stored as null.
    pub fn set_metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), Value::from(value));
    }

    /// Finite numeric value of a metric, `None` when missing or unusable.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .get(name)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_COMPANY_NAME)
    }

    /// Label used in summaries; unlabeled companies read as neutral.
    pub fn sentiment_label(&self) -> SentimentLabel {
        self.sentiment_label.unwrap_or_default()
    }

    /// Merge aggregated news sentiment into this record.
    pub fn apply_news_sentiment(&mut self, sentiment: &NewsSentiment) {
        self.set_metric("sentiment_score", sentiment.score);
        self.sentiment_label = Some(sentiment.label);
        self.news = sentiment.recent_news.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_metrics_read_as_missing() {
        let company = CompanyData::new("Acme")
            .with_metric("current_ratio", f64::NAN)
            .with_metric("beta", f64::INFINITY)
            .with_metric("profit_margin", 12.5);

        assert_eq!(company.metric("current_ratio"), None);
        assert_eq!(company.metric("beta"), None);
        assert_eq!(company.metric("profit_margin"), Some(12.5));
        assert_eq!(company.metric("quick_ratio"), None);
    }

    #[test]
    fn test_deserialize_flattens_metrics() {
        let json = r#"{
            "company_name": "Apple Inc.",
            "sector": "Technology",
            "sentiment_label": "Positive",
            "current_ratio": 0.87,
            "debt_to_equity": null,
            "beta": "n/a"
        }"#;

        let company: CompanyData = serde_json::from_str(json).unwrap();
        assert_eq!(company.display_name(), "Apple Inc.");
        assert_eq!(company.sector.as_deref(), Some("Technology"));
        assert_eq!(company.sentiment_label(), SentimentLabel::Positive);
        assert_eq!(company.metric("current_ratio"), Some(0.87));
        assert_eq!(company.metric("debt_to_equity"), None);
        assert_eq!(company.metric("beta"), None);
    }

    #[test]
    fn test_defaults_for_unnamed_company() {
        let company = CompanyData::default();
        assert_eq!(company.display_name(), DEFAULT_COMPANY_NAME);
        assert_eq!(company.sentiment_label(), SentimentLabel::Neutral);
    }

    #[test]
    fn test_apply_news_sentiment() {
        let mut company = CompanyData::new("Acme");
        let sentiment = NewsSentiment {
            score: 72.0,
            label: SentimentLabel::Positive,
            news_count: 1,
            recent_news: vec![NewsItem::new("Acme beats expectations")],
        };

        company.apply_news_sentiment(&sentiment);

        assert_eq!(company.metric("sentiment_score"), Some(72.0));
        assert_eq!(company.sentiment_label(), SentimentLabel::Positive);
        assert_eq!(company.news.len(), 1);
    }
}
