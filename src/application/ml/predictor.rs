use crate::domain::company::CompanyData;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::ml::heuristic::heuristic_score;

/// Interface for credit scoring models
pub trait CreditScorer: Send + Sync {
    /// Credit score in [0, 100]
    fn score(&self, company: &CompanyData) -> Result<f64, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// The labeling formula exposed as a scorer, for side-by-side comparison with
/// the trained model.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl CreditScorer for HeuristicScorer {
    fn score(&self, company: &CompanyData) -> Result<f64, ModelError> {
        Ok(heuristic_score(&FeatureVector::extract(company)))
    }

    fn name(&self) -> &str {
        "Heuristic Rules"
    }

    fn version(&self) -> &str {
        "v1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_scorer_matches_formula() {
        let company = CompanyData::new("Acme")
            .with_metric("current_ratio", 1.8)
            .with_metric("debt_to_equity", 40.0);

        let expected = heuristic_score(&FeatureVector::extract(&company));
        assert_eq!(HeuristicScorer.score(&company).unwrap(), expected);
    }
}
