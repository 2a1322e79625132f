use crate::domain::ml::feature_registry::Feature;
use crate::domain::sentiment::NewsItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactType {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::VeryHigh => write!(f, "VERY HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCategory {
    pub level: RiskLevel,
    pub description: String,
}

impl RiskCategory {
    pub fn from_score(score: f64) -> Self {
        let (level, description) = if score >= 70.0 {
            (RiskLevel::Low, "Strong credit profile")
        } else if score >= 50.0 {
            (RiskLevel::Medium, "Moderate credit risk")
        } else if score >= 30.0 {
            (RiskLevel::High, "Elevated credit risk")
        } else {
            (RiskLevel::VeryHigh, "Significant credit concerns")
        };

        Self {
            level,
            description: description.to_string(),
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self.level, RiskLevel::High | RiskLevel::VeryHigh)
    }
}

/// Directional impact of one feature on the credit profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEntry {
    pub feature: Feature,
    pub value: f64,
    pub description: String,
    pub impact_type: ImpactType,
    pub strength: Strength,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub recommendation: String,
    pub priority: Priority,
}

/// Report built for one prediction; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub company_name: String,
    pub overall_score: f64,
    pub risk_category: RiskCategory,
    pub feature_impacts: BTreeMap<Feature, ImpactEntry>,
    pub key_strengths: Vec<ImpactEntry>,
    pub key_weaknesses: Vec<ImpactEntry>,
    pub recommendations: Vec<Recommendation>,
    pub recent_events: Vec<NewsItem>,
    pub summary: String,
}
