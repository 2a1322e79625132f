use crate::domain::company::CompanyData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Number of model features.
pub const FEATURE_COUNT: usize = 16;

/// Ordered list of feature names.
/// Persisted models store this list and are rejected on load if it differs.
/// Any change here is a breaking change for saved models.
pub const FEATURE_NAMES: &[&str] = &[
    "debt_to_equity",
    "current_ratio",
    "quick_ratio",
    "return_on_equity",
    "return_on_assets",
    "profit_margin",
    "operating_margin",
    "revenue_growth",
    "earnings_growth",
    "price_to_book",
    "price_to_earnings",
    "beta",
    "stock_volatility",
    "price_momentum_30d",
    "volume_trend",
    "sentiment_score",
];

/// Model features in canonical order (the derived `Ord` follows it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    ReturnOnEquity,
    ReturnOnAssets,
    ProfitMargin,
    OperatingMargin,
    RevenueGrowth,
    EarningsGrowth,
    PriceToBook,
    PriceToEarnings,
    Beta,
    StockVolatility,
    #[serde(rename = "price_momentum_30d")]
    PriceMomentum30d,
    VolumeTrend,
    SentimentScore,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::DebtToEquity,
        Feature::CurrentRatio,
        Feature::QuickRatio,
        Feature::ReturnOnEquity,
        Feature::ReturnOnAssets,
        Feature::ProfitMargin,
        Feature::OperatingMargin,
        Feature::RevenueGrowth,
        Feature::EarningsGrowth,
        Feature::PriceToBook,
        Feature::PriceToEarnings,
        Feature::Beta,
        Feature::StockVolatility,
        Feature::PriceMomentum30d,
        Feature::VolumeTrend,
        Feature::SentimentScore,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Human-readable label, e.g. "Debt To Equity".
    pub fn label(self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::DebtToEquity => {
                "Debt-to-Equity Ratio: Lower values indicate less financial leverage and lower risk"
            }
            Feature::CurrentRatio => {
                "Current Ratio: Higher values show better ability to pay short-term obligations"
            }
            Feature::QuickRatio => "Quick Ratio: Measures immediate liquidity without inventory",
            Feature::ReturnOnEquity => {
                "Return on Equity: Higher values indicate more efficient use of shareholder equity"
            }
            Feature::ReturnOnAssets => {
                "Return on Assets: Shows how efficiently company uses its assets"
            }
            Feature::ProfitMargin => {
                "Profit Margin: Higher margins indicate better operational efficiency"
            }
            Feature::OperatingMargin => "Operating Margin: Core business profitability measure",
            Feature::RevenueGrowth => "Revenue Growth: Positive growth indicates business expansion",
            Feature::EarningsGrowth => "Earnings Growth: Shows profitability trend",
            Feature::PriceToBook => "Price-to-Book Ratio: Market valuation relative to book value",
            Feature::PriceToEarnings => "P/E Ratio: Market valuation relative to earnings",
            Feature::Beta => "Beta: Market risk measure (>1 = more volatile than market)",
            Feature::StockVolatility => {
                "Stock Volatility: Price stability measure (lower is better)"
            }
            Feature::PriceMomentum30d => "30-Day Price Momentum: Recent stock performance",
            Feature::VolumeTrend => "Volume Trend: Trading activity pattern",
            Feature::SentimentScore => "News Sentiment: Market perception from recent news",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.name() == s)
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// Fixed-order vector of finite feature values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Normalizes raw company data into the canonical feature order.
    /// Missing, non-numeric and non-finite values become 0.0; this never fails.
    pub fn extract(company: &CompanyData) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        let mut coerced = Vec::new();

        for feature in Feature::ALL {
            match company.metric(feature.name()) {
                Some(value) => values[feature.index()] = value,
                None => coerced.push(feature.name()),
            }
        }

        if !coerced.is_empty() {
            debug!(
                "Data quality: {} missing or non-finite features coerced to 0.0 for {}: {:?}",
                coerced.len(),
                company.display_name(),
                coerced
            );
        }

        Self(values)
    }

    /// Builds a vector from raw values, applying the same coercion as `extract`.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values.map(|v| if v.is_finite() { v } else { 0.0 }))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}
