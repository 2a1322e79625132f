//! Rule-based credit score used to label training data.
//!
//! The boosted regressor is trained to imitate this formula: it is the label
//! generator, not an independent ground truth, and never the production score.

use super::feature_registry::{Feature, FeatureVector};
use super::thresholds::Threshold;
use serde::{Deserialize, Serialize};

pub const BASELINE_SCORE: f64 = 50.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleGroup {
    Liquidity,
    Profitability,
    Leverage,
    SentimentStability,
    Growth,
}

/// Monotone step function over one feature: the first matching step wins,
/// otherwise `fallback` applies.
struct StepRule {
    group: RuleGroup,
    feature: Feature,
    steps: &'static [(Threshold, f64)],
    fallback: f64,
}

const RULES: &[StepRule] = &[
    StepRule {
        group: RuleGroup::Liquidity,
        feature: Feature::CurrentRatio,
        steps: &[
            (Threshold::Above(2.0), 15.0),
            (Threshold::Above(1.5), 10.0),
            (Threshold::Above(1.0), 5.0),
        ],
        fallback: -10.0,
    },
    StepRule {
        group: RuleGroup::Profitability,
        feature: Feature::ReturnOnEquity,
        steps: &[
            (Threshold::Above(15.0), 12.0),
            (Threshold::Above(10.0), 8.0),
            (Threshold::Above(5.0), 4.0),
        ],
        fallback: -5.0,
    },
    StepRule {
        group: RuleGroup::Profitability,
        feature: Feature::ProfitMargin,
        steps: &[
            (Threshold::Above(20.0), 8.0),
            (Threshold::Above(10.0), 5.0),
            (Threshold::Above(5.0), 2.0),
        ],
        fallback: 0.0,
    },
    StepRule {
        group: RuleGroup::Leverage,
        feature: Feature::DebtToEquity,
        steps: &[
            (Threshold::Below(30.0), 12.0),
            (Threshold::Below(50.0), 8.0),
            (Threshold::Below(100.0), 2.0),
        ],
        fallback: -10.0,
    },
    StepRule {
        group: RuleGroup::SentimentStability,
        feature: Feature::SentimentScore,
        steps: &[(Threshold::Above(60.0), 8.0), (Threshold::Above(40.0), 2.0)],
        fallback: -5.0,
    },
    StepRule {
        group: RuleGroup::SentimentStability,
        feature: Feature::StockVolatility,
        steps: &[
            (Threshold::Below(15.0), 5.0),
            (Threshold::Below(25.0), 2.0),
            (Threshold::Above(40.0), -8.0),
        ],
        fallback: 0.0,
    },
    StepRule {
        group: RuleGroup::Growth,
        feature: Feature::RevenueGrowth,
        steps: &[(Threshold::Above(10.0), 5.0), (Threshold::Below(-10.0), -8.0)],
        fallback: 0.0,
    },
];

impl StepRule {
    fn points(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|(threshold, _)| threshold.matches(value))
            .map_or(self.fallback, |(_, points)| *points)
    }
}

/// Points one rule added to (or removed from) the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub group: RuleGroup,
    pub feature: Feature,
    pub value: f64,
    pub points: f64,
}

/// Per-rule adjustments in rule-table order.
pub fn heuristic_breakdown(features: &FeatureVector) -> Vec<RuleContribution> {
    RULES
        .iter()
        .map(|rule| {
            let value = features.get(rule.feature);
            RuleContribution {
                group: rule.group,
                feature: rule.feature,
                value,
                points: rule.points(value),
            }
        })
        .collect()
}

/// Heuristic credit score in [0, 100].
pub fn heuristic_score(features: &FeatureVector) -> f64 {
    let adjustment: f64 = heuristic_breakdown(features)
        .iter()
        .map(|c| c.points)
        .sum();
    (BASELINE_SCORE + adjustment).clamp(MIN_SCORE, MAX_SCORE)
}
