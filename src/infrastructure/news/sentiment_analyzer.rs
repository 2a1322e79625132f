//! Local NLP-based sentiment analysis using VADER
//!
//! Scores company news headlines with the VADER (Valence Aware Dictionary and
//! sEntiment Reasoner) algorithm, boosted with corporate-finance keywords, and
//! aggregates them into the 0-100 `sentiment_score` feature.
//!
//! # Example
//! ```rust,ignore
//! use creditlens::infrastructure::news::sentiment_analyzer::SentimentAnalyzer;
//!
//! let analyzer = SentimentAnalyzer::new();
//! let score = analyzer.analyze("Company beats expectations and raises guidance");
//! assert!(score > 0.0);
//! ```

use crate::domain::company::CompanyData;
use crate::domain::ml::feature_registry::Feature;
use crate::domain::sentiment::{NEUTRAL_SENTIMENT_SCORE, NewsItem, NewsSentiment, SentimentLabel};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Headlines scored per company.
const MAX_SCORED_ARTICLES: usize = 10;
/// Scored headlines kept for display.
const MAX_RECENT_NEWS: usize = 5;

/// Corporate-finance phrases VADER's general lexicon underweights.
const POSITIVE_KEYWORDS: &[(&str, f64)] = &[
    ("beat expectations", 0.4),
    ("beats expectations", 0.4),
    ("record revenue", 0.4),
    ("record profit", 0.4),
    ("raises guidance", 0.4),
    ("guidance raised", 0.4),
    ("upgrade", 0.3),
    ("upgraded", 0.3),
    ("buyback", 0.2),
    ("dividend increase", 0.3),
    ("acquisition completed", 0.2),
    ("debt reduction", 0.3),
    ("deleveraging", 0.3),
    ("strong cash flow", 0.3),
    ("outperform", 0.3),
    ("surge", 0.3),
    ("surges", 0.3),
    ("rally", 0.3),
];

const NEGATIVE_KEYWORDS: &[(&str, f64)] = &[
    ("default", -0.5),
    ("bankruptcy", -0.6),
    ("chapter 11", -0.6),
    ("downgrade", -0.4),
    ("downgraded", -0.4),
    ("misses expectations", -0.4),
    ("missed expectations", -0.4),
    ("cuts guidance", -0.4),
    ("profit warning", -0.5),
    ("layoffs", -0.3),
    ("lawsuit", -0.4),
    ("investigation", -0.3),
    ("fraud", -0.5),
    ("restatement", -0.4),
    ("liquidity crunch", -0.5),
    ("debt issuance", -0.1),
    ("plunge", -0.4),
    ("plunges", -0.4),
];

/// A sentiment analyzer using VADER algorithm with financial boosting.
pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    /// Create a new sentiment analyzer instance.
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    fn financial_boost(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();

        POSITIVE_KEYWORDS
            .iter()
            .chain(NEGATIVE_KEYWORDS)
            .filter(|(keyword, _)| text_lower.contains(keyword))
            .map(|(_, score)| score)
            .sum()
    }

    /// Analyze text and return a polarity between -1.0 and 1.0.
    ///
    /// The analysis combines VADER's compound score with financial keyword boosting.
    pub fn analyze(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let vader_score = scores["compound"];
        let combined = vader_score + (self.financial_boost(text) * 0.5);
        combined.clamp(-1.0, 1.0)
    }

    /// Analyze both title and summary, title weighted 70%.
    pub fn analyze_news(&self, title: &str, summary: &str) -> f64 {
        if summary.trim().is_empty() {
            return self.analyze(title);
        }
        (self.analyze(title) * 0.7) + (self.analyze(summary) * 0.3)
    }

    /// Scores the latest headlines and maps their mean polarity onto 0-100.
    pub fn summarize(&self, news: &[NewsItem]) -> NewsSentiment {
        let scored: Vec<NewsItem> = news
            .iter()
            .take(MAX_SCORED_ARTICLES)
            .map(|item| NewsItem {
                sentiment: Some(self.analyze_news(&item.title, &item.summary)),
                ..item.clone()
            })
            .collect();

        if scored.is_empty() {
            return NewsSentiment::default();
        }

        let mean_polarity = scored.iter().filter_map(|item| item.sentiment).sum::<f64>()
            / scored.len() as f64;
        let score = (mean_polarity + 1.0) * NEUTRAL_SENTIMENT_SCORE;

        NewsSentiment {
            score,
            label: SentimentLabel::from_score(score),
            news_count: scored.len(),
            recent_news: scored.into_iter().take(MAX_RECENT_NEWS).collect(),
        }
    }

    /// Derives `sentiment_score` from the company's news when the record has
    /// headlines but no score of its own. Returns whether the record changed.
    pub fn enrich(&self, company: &mut CompanyData) -> bool {
        if company.news.is_empty() || company.metric(Feature::SentimentScore.name()).is_some() {
            return false;
        }
        let sentiment = self.summarize(&company.news);
        tracing::debug!(
            "{}: sentiment {:.1} ({}) from {} headlines",
            company.display_name(),
            sentiment.score,
            sentiment.label,
            sentiment.news_count
        );
        company.apply_news_sentiment(&sentiment);
        true
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_headlines() {
        let analyzer = SentimentAnalyzer::new();

        let headlines = [
            "Quarterly earnings beat expectations as revenue grows",
            "Company raises guidance after record profit",
            "Analysts upgrade the stock citing strong cash flow",
        ];

        for headline in headlines {
            let score = analyzer.analyze(headline);
            assert!(score > 0.0, "Expected positive score for '{}', got {}", headline, score);
        }
    }

    #[test]
    fn test_negative_headlines() {
        let analyzer = SentimentAnalyzer::new();

        let headlines = [
            "Retailer files for bankruptcy after missed payments",
            "Regulators open fraud investigation into lender",
            "Shares plunge after profit warning and downgrade",
        ];

        for headline in headlines {
            let score = analyzer.analyze(headline);
            assert!(score < 0.0, "Expected negative score for '{}', got {}", headline, score);
        }
    }

    #[test]
    fn test_empty_text() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.analyze(""), 0.0);
        assert_eq!(analyzer.analyze("   "), 0.0);
    }

    #[test]
    fn test_summarize_without_news_is_neutral() {
        let summary = SentimentAnalyzer::new().summarize(&[]);
        assert_eq!(summary.score, NEUTRAL_SENTIMENT_SCORE);
        assert_eq!(summary.label, SentimentLabel::Neutral);
        assert_eq!(summary.news_count, 0);
    }

    #[test]
    fn test_summarize_caps_and_scores_items() {
        let news: Vec<NewsItem> = (0..12)
            .map(|i| NewsItem::new(format!("Company beats expectations, record revenue {}", i)))
            .collect();

        let summary = SentimentAnalyzer::new().summarize(&news);
        assert_eq!(summary.news_count, MAX_SCORED_ARTICLES);
        assert_eq!(summary.recent_news.len(), MAX_RECENT_NEWS);
        assert!(summary.recent_news.iter().all(|item| item.sentiment.is_some()));
        assert!(summary.score > NEUTRAL_SENTIMENT_SCORE);
        assert!(summary.score <= 100.0);
    }

    #[test]
    fn test_enrich_only_fills_missing_score() {
        let analyzer = SentimentAnalyzer::new();

        let mut scored = CompanyData::new("Scored").with_metric("sentiment_score", 72.0);
        scored.news.push(NewsItem::new("Lender files for bankruptcy"));
        assert!(!analyzer.enrich(&mut scored));
        assert_eq!(scored.metric("sentiment_score"), Some(72.0));

        let mut unscored = CompanyData::new("Unscored");
        assert!(!analyzer.enrich(&mut unscored));

        unscored.news.push(NewsItem::new("Lender files for bankruptcy amid fraud investigation"));
        assert!(analyzer.enrich(&mut unscored));
        let score = unscored.metric("sentiment_score").unwrap();
        assert!(score < NEUTRAL_SENTIMENT_SCORE);
        assert_eq!(unscored.sentiment_label(), SentimentLabel::from_score(score));
    }
}
