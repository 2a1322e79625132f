use crate::application::ml::predictor::CreditScorer;
use crate::domain::company::CompanyData;
use crate::domain::errors::AnalysisError;
use crate::domain::explanation::{RiskCategory, RiskLevel};
use crate::domain::ml::feature_registry::{Feature, FeatureVector};
use crate::domain::sentiment::NEUTRAL_SENTIMENT_SCORE;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_COMPARED_COMPANIES: usize = 2;

/// One line of a side-by-side company comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub ticker: String,
    pub company: String,
    pub sector: String,
    pub credit_score: f64,
    pub risk_level: RiskLevel,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
    pub return_on_equity: f64,
    pub profit_margin: f64,
    pub sentiment_score: f64,
    pub market_cap_billions: f64,
}

/// Scores every company (in parallel) and ranks them by credit score, best first.
pub fn compare_companies(
    scorer: &dyn CreditScorer,
    companies: &[(String, CompanyData)],
) -> Result<Vec<ComparisonRow>, AnalysisError> {
    if companies.len() < MIN_COMPARED_COMPANIES {
        return Err(AnalysisError::InsufficientCompanies {
            needed: MIN_COMPARED_COMPANIES,
            got: companies.len(),
        });
    }

    let mut rows = companies
        .par_iter()
        .map(|(ticker, company)| -> Result<ComparisonRow, AnalysisError> {
            let credit_score = scorer.score(company)?;
            let features = FeatureVector::extract(company);

            Ok(ComparisonRow {
                ticker: ticker.clone(),
                company: company.display_name().to_string(),
                sector: company.sector.clone().unwrap_or_else(|| "Unknown".to_string()),
                credit_score,
                risk_level: RiskCategory::from_score(credit_score).level,
                debt_to_equity: features.get(Feature::DebtToEquity),
                current_ratio: features.get(Feature::CurrentRatio),
                return_on_equity: features.get(Feature::ReturnOnEquity),
                profit_margin: features.get(Feature::ProfitMargin),
                sentiment_score: company
                    .metric(Feature::SentimentScore.name())
                    .unwrap_or(NEUTRAL_SENTIMENT_SCORE),
                market_cap_billions: company.metric("market_cap").unwrap_or(0.0) / 1e9,
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    rows.sort_by(|a, b| b.credit_score.total_cmp(&a.credit_score));

    info!(
        "Compared {} companies with {} ({})",
        rows.len(),
        scorer.name(),
        scorer.version()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::HeuristicScorer;

    #[test]
    fn test_requires_two_companies() {
        let companies = vec![("AAA".to_string(), CompanyData::new("Alpha"))];
        let err = compare_companies(&HeuristicScorer, &companies).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientCompanies { needed: 2, got: 1 }
        ));
    }

    #[test]
    fn test_rows_ranked_by_score() {
        let companies = vec![
            (
                "WEAK".to_string(),
                CompanyData::new("Weak Co").with_metric("debt_to_equity", 300.0),
            ),
            (
                "STRONG".to_string(),
                CompanyData::new("Strong Co")
                    .with_sector("Technology")
                    .with_metric("current_ratio", 3.0)
                    .with_metric("market_cap", 2.5e12),
            ),
        ];

        let rows = compare_companies(&HeuristicScorer, &companies).unwrap();
        assert_eq!(rows[0].ticker, "STRONG");
        assert_eq!(rows[0].sector, "Technology");
        assert!((rows[0].market_cap_billions - 2500.0).abs() < 1e-9);
        assert_eq!(rows[1].sector, "Unknown");
        assert_eq!(rows[1].sentiment_score, NEUTRAL_SENTIMENT_SCORE);
        assert!(rows[0].credit_score > rows[1].credit_score);
    }
}
