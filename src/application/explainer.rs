//! Rule-based credit explanations.
//!
//! Each feature is judged against fixed thresholds, independently of the
//! trained model's internals.

use crate::domain::company::CompanyData;
use crate::domain::explanation::{
    Explanation, ImpactEntry, ImpactType, Priority, Recommendation, RiskCategory, RiskLevel,
    Strength,
};
use crate::domain::ml::feature_registry::Feature;
use crate::domain::ml::thresholds::Threshold;
use crate::domain::sentiment::SentimentLabel;
use std::collections::BTreeMap;
use tracing::debug;

/// Weaknesses considered for recommendations.
const MAX_RECOMMENDED_WEAKNESSES: usize = 3;
/// Strengths and weaknesses named in the summary.
const MAX_SUMMARY_FEATURES: usize = 2;

const NEUTRAL_EXPLANATION: &str = "No significant impact on the credit profile";
const MISSING_EXPLANATION: &str = "Data unavailable; treated as neutral";

struct ImpactRule {
    feature: Feature,
    threshold: Threshold,
    impact_type: ImpactType,
    strength: Strength,
    explanation: &'static str,
}

/// Per-feature rules; the first matching rule for a feature wins.
const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule {
        feature: Feature::DebtToEquity,
        threshold: Threshold::Below(30.0),
        impact_type: ImpactType::Positive,
        strength: Strength::High,
        explanation: "Low debt levels indicate strong financial stability",
    },
    ImpactRule {
        feature: Feature::DebtToEquity,
        threshold: Threshold::Above(100.0),
        impact_type: ImpactType::Negative,
        strength: Strength::High,
        explanation: "High debt levels may indicate financial stress",
    },
    ImpactRule {
        feature: Feature::CurrentRatio,
        threshold: Threshold::Above(2.0),
        impact_type: ImpactType::Positive,
        strength: Strength::Medium,
        explanation: "Strong liquidity position",
    },
    ImpactRule {
        feature: Feature::CurrentRatio,
        threshold: Threshold::Below(1.0),
        impact_type: ImpactType::Negative,
        strength: Strength::High,
        explanation: "Potential liquidity concerns",
    },
    ImpactRule {
        feature: Feature::ReturnOnEquity,
        threshold: Threshold::Above(15.0),
        impact_type: ImpactType::Positive,
        strength: Strength::High,
        explanation: "Excellent return on shareholder investment",
    },
    ImpactRule {
        feature: Feature::ReturnOnEquity,
        threshold: Threshold::Below(5.0),
        impact_type: ImpactType::Negative,
        strength: Strength::Medium,
        explanation: "Below-average profitability",
    },
    ImpactRule {
        feature: Feature::ProfitMargin,
        threshold: Threshold::Above(20.0),
        impact_type: ImpactType::Positive,
        strength: Strength::High,
        explanation: "Strong operational efficiency",
    },
    ImpactRule {
        feature: Feature::ProfitMargin,
        threshold: Threshold::Below(5.0),
        impact_type: ImpactType::Negative,
        strength: Strength::Medium,
        explanation: "Margin pressure concerns",
    },
    ImpactRule {
        feature: Feature::SentimentScore,
        threshold: Threshold::Above(60.0),
        impact_type: ImpactType::Positive,
        strength: Strength::High,
        explanation: "Positive market sentiment",
    },
    ImpactRule {
        feature: Feature::SentimentScore,
        threshold: Threshold::Below(40.0),
        impact_type: ImpactType::Negative,
        strength: Strength::Medium,
        explanation: "Negative market sentiment",
    },
];

struct RecommendationRule {
    feature: Feature,
    category: &'static str,
    recommendation: &'static str,
    priority: Priority,
}

const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        feature: Feature::DebtToEquity,
        category: "Financial Structure",
        recommendation: "Consider debt reduction strategies to improve leverage ratios",
        priority: Priority::High,
    },
    RecommendationRule {
        feature: Feature::CurrentRatio,
        category: "Liquidity Management",
        recommendation: "Improve working capital management to enhance liquidity",
        priority: Priority::High,
    },
    RecommendationRule {
        feature: Feature::ProfitMargin,
        category: "Operational Efficiency",
        recommendation: "Focus on cost optimization and operational improvements",
        priority: Priority::Medium,
    },
    RecommendationRule {
        feature: Feature::SentimentScore,
        category: "Market Communication",
        recommendation: "Enhance investor relations and market communication",
        priority: Priority::Low,
    },
];

const RISK_MANAGEMENT_CATEGORY: &str = "Risk Management";
const RISK_MANAGEMENT_RECOMMENDATION: &str = "Implement comprehensive risk management framework";

/// Builds the per-prediction credit report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Explainer;

impl Explainer {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: unusable inputs fall back to neutral entries.
    pub fn explain(&self, company: &CompanyData, score: f64) -> Explanation {
        let risk_category = RiskCategory::from_score(score);

        let feature_impacts: BTreeMap<Feature, ImpactEntry> = Feature::ALL
            .into_iter()
            .map(|feature| (feature, self.analyze_feature(feature, company.metric(feature.name()))))
            .collect();

        let key_strengths: Vec<ImpactEntry> = feature_impacts
            .values()
            .filter(|e| e.impact_type == ImpactType::Positive && e.strength == Strength::High)
            .cloned()
            .collect();
        let key_weaknesses: Vec<ImpactEntry> = feature_impacts
            .values()
            .filter(|e| e.impact_type == ImpactType::Negative && e.strength == Strength::High)
            .cloned()
            .collect();

        let recommendations = self.recommendations(&key_weaknesses, &risk_category);
        let summary = self.summary(
            company,
            score,
            risk_category.level,
            &key_strengths,
            &key_weaknesses,
        );

        debug!(
            "Explained {}: score {:.1}, {} strengths, {} weaknesses",
            company.display_name(),
            score,
            key_strengths.len(),
            key_weaknesses.len()
        );

        Explanation {
            company_name: company.display_name().to_string(),
            overall_score: score,
            risk_category,
            feature_impacts,
            key_strengths,
            key_weaknesses,
            recommendations,
            recent_events: company.news.clone(),
            summary,
        }
    }

    /// Classifies one feature. `None` means the raw value was missing or unusable.
    pub fn analyze_feature(&self, feature: Feature, value: Option<f64>) -> ImpactEntry {
        let mut entry = ImpactEntry {
            feature,
            value: value.unwrap_or(0.0),
            description: feature.description().to_string(),
            impact_type: ImpactType::Neutral,
            strength: Strength::Low,
            explanation: NEUTRAL_EXPLANATION.to_string(),
        };

        let Some(value) = value else {
            entry.explanation = MISSING_EXPLANATION.to_string();
            return entry;
        };

        if let Some(rule) = IMPACT_RULES
            .iter()
            .find(|rule| rule.feature == feature && rule.threshold.matches(value))
        {
            entry.impact_type = rule.impact_type;
            entry.strength = rule.strength;
            entry.explanation = rule.explanation.to_string();
        }

        entry
    }

    fn recommendations(
        &self,
        weaknesses: &[ImpactEntry],
        risk_category: &RiskCategory,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = weaknesses
            .iter()
            .take(MAX_RECOMMENDED_WEAKNESSES)
            .filter_map(|weakness| {
                RECOMMENDATION_RULES
                    .iter()
                    .find(|rule| rule.feature == weakness.feature)
            })
            .map(|rule| Recommendation {
                category: rule.category.to_string(),
                recommendation: rule.recommendation.to_string(),
                priority: rule.priority,
            })
            .collect();

        if risk_category.is_elevated() {
            recommendations.push(Recommendation {
                category: RISK_MANAGEMENT_CATEGORY.to_string(),
                recommendation: RISK_MANAGEMENT_RECOMMENDATION.to_string(),
                priority: Priority::Critical,
            });
        }

        recommendations
    }

    fn summary(
        &self,
        company: &CompanyData,
        score: f64,
        level: RiskLevel,
        strengths: &[ImpactEntry],
        weaknesses: &[ImpactEntry],
    ) -> String {
        let mut summary = format!(
            "{} has a credit score of {:.1}/100, indicating {} credit risk. ",
            company.display_name(),
            score,
            level.to_string().to_lowercase()
        );

        if !strengths.is_empty() {
            summary.push_str(&format!(
                "Key strengths include strong {}. ",
                joined_labels(strengths)
            ));
        }

        if !weaknesses.is_empty() {
            summary.push_str(&format!("Main concerns are {}. ", joined_labels(weaknesses)));
        }

        let sentiment = company.sentiment_label();
        if sentiment != SentimentLabel::Neutral {
            summary.push_str(&format!(
                "Recent news sentiment is {}. ",
                sentiment.to_string().to_lowercase()
            ));
        }

        summary.push_str(match level {
            RiskLevel::Low => {
                "The company demonstrates solid financial health with minimal credit risk."
            }
            RiskLevel::Medium => "Monitor key financial metrics and market conditions closely.",
            RiskLevel::High | RiskLevel::VeryHigh => {
                "Immediate attention required to address financial vulnerabilities."
            }
        });

        summary
    }
}

fn joined_labels(entries: &[ImpactEntry]) -> String {
    entries
        .iter()
        .take(MAX_SUMMARY_FEATURES)
        .map(|e| e.feature.label())
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_table_boundaries() {
        let explainer = Explainer::new();
        let cases = [
            (Feature::DebtToEquity, 29.9, ImpactType::Positive, Strength::High),
            (Feature::DebtToEquity, 30.0, ImpactType::Neutral, Strength::Low),
            (Feature::DebtToEquity, 100.0, ImpactType::Neutral, Strength::Low),
            (Feature::DebtToEquity, 100.1, ImpactType::Negative, Strength::High),
            (Feature::CurrentRatio, 2.1, ImpactType::Positive, Strength::Medium),
            (Feature::CurrentRatio, 1.0, ImpactType::Neutral, Strength::Low),
            (Feature::CurrentRatio, 0.9, ImpactType::Negative, Strength::High),
            (Feature::ReturnOnEquity, 15.1, ImpactType::Positive, Strength::High),
            (Feature::ReturnOnEquity, 4.9, ImpactType::Negative, Strength::Medium),
            (Feature::ProfitMargin, 20.1, ImpactType::Positive, Strength::High),
            (Feature::ProfitMargin, 5.0, ImpactType::Neutral, Strength::Low),
            (Feature::ProfitMargin, 4.9, ImpactType::Negative, Strength::Medium),
            (Feature::SentimentScore, 60.1, ImpactType::Positive, Strength::High),
            (Feature::SentimentScore, 39.9, ImpactType::Negative, Strength::Medium),
            (Feature::Beta, 3.0, ImpactType::Neutral, Strength::Low),
        ];

        for (feature, value, impact, strength) in cases {
            let entry = explainer.analyze_feature(feature, Some(value));
            assert_eq!(entry.impact_type, impact, "{} = {}", feature, value);
            assert_eq!(entry.strength, strength, "{} = {}", feature, value);
        }
    }

    #[test]
    fn test_missing_value_is_neutral() {
        let entry = Explainer::new().analyze_feature(Feature::CurrentRatio, None);
        assert_eq!(entry.impact_type, ImpactType::Neutral);
        assert_eq!(entry.strength, Strength::Low);
        assert_eq!(entry.value, 0.0);
        assert_eq!(entry.explanation, MISSING_EXPLANATION);
    }

    #[test]
    fn test_recommendations_follow_weakness_order_then_risk() {
        let company = CompanyData::new("Stressed Co")
            .with_metric("debt_to_equity", 250.0)
            .with_metric("current_ratio", 0.5);

        let explanation = Explainer::new().explain(&company, 25.0);
        let categories: Vec<&str> = explanation
            .recommendations
            .iter()
            .map(|r| r.category.as_str())
            .collect();

        assert_eq!(
            categories,
            vec!["Financial Structure", "Liquidity Management", "Risk Management"]
        );
        assert_eq!(explanation.recommendations[2].priority, Priority::Critical);
    }

    #[test]
    fn test_no_risk_addendum_for_medium() {
        let company = CompanyData::new("Mid Co").with_metric("debt_to_equity", 150.0);
        let explanation = Explainer::new().explain(&company, 55.0);

        assert_eq!(explanation.recommendations.len(), 1);
        assert_eq!(explanation.recommendations[0].priority, Priority::High);
    }

    #[test]
    fn test_summary_mentions_sentiment_and_closing() {
        let mut company = CompanyData::new("Gloomy Inc").with_metric("current_ratio", 0.4);
        company.sentiment_label = Some(SentimentLabel::Negative);

        let summary = Explainer::new().explain(&company, 42.0).summary;
        assert!(summary.starts_with("Gloomy Inc has a credit score of 42.0/100, indicating high credit risk."));
        assert!(summary.contains("Main concerns are Current Ratio."));
        assert!(summary.contains("Recent news sentiment is negative."));
        assert!(summary.ends_with("Immediate attention required to address financial vulnerabilities."));
    }

    #[test]
    fn test_summary_names_at_most_two_strengths() {
        let company = CompanyData::new("Solid Corp")
            .with_metric("debt_to_equity", 10.0)
            .with_metric("return_on_equity", 30.0)
            .with_metric("profit_margin", 30.0);

        let summary = Explainer::new().explain(&company, 88.0).summary;
        assert!(summary.contains("Key strengths include strong Debt To Equity and Return On Equity."));
        assert!(!summary.contains("Profit Margin"));
        assert!(!summary.contains("news sentiment"));
        assert!(summary.ends_with("minimal credit risk."));
    }
}
