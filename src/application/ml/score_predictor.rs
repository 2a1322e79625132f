use super::predictor::CreditScorer;
use super::training_set::TrainingSet;
use crate::domain::company::CompanyData;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FEATURE_NAMES, Feature, FeatureVector};
use crate::domain::ml::gradient_boosting::{GbmParams, GradientBoostedRegressor};
use crate::domain::ml::heuristic::{MAX_SCORE, MIN_SCORE};
use crate::domain::ml::standardizer::Standardizer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Minimum number of companies required to train.
pub const MIN_TRAINING_SAMPLES: usize = 3;

/// A regressor together with the standardizer it was fit with.
///
/// Both halves are produced by the same training run and always travel as one
/// unit, in memory and on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedModel {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    feature_names: Vec<String>,
    standardizer: Standardizer,
    regressor: GradientBoostedRegressor,
}

impl TrainedModel {
    fn fit(training_set: &TrainingSet, params: GbmParams) -> Result<Self, ModelError> {
        if training_set.len() < MIN_TRAINING_SAMPLES {
            return Err(ModelError::InsufficientData {
                needed: MIN_TRAINING_SAMPLES,
                got: training_set.len(),
            });
        }

        let rows = training_set.feature_rows();
        let standardizer = Standardizer::fit(&rows)?;
        let scaled = standardizer.transform_rows(&rows)?;
        let regressor = GradientBoostedRegressor::fit(&scaled, &training_set.labels(), params)?;

        Ok(Self {
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            training_samples: training_set.len(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            standardizer,
            regressor,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn params(&self) -> &GbmParams {
        self.regressor.params()
    }

    pub fn n_trees(&self) -> usize {
        self.regressor.n_trees()
    }

    /// Raw regressor output for an extracted vector, clamped to [0, 100].
    pub fn predict_features(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let scaled = self.standardizer.transform(features.values())?;
        let raw = self.regressor.predict_one(&scaled)?;
        Ok(raw.clamp(MIN_SCORE, MAX_SCORE))
    }

    /// Feature importances sorted descending.
    pub fn feature_importance(&self) -> Vec<(Feature, f64)> {
        let mut ranked: Vec<(Feature, f64)> = Feature::ALL
            .into_iter()
            .zip(self.regressor.feature_importances().iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restores a bundle, rejecting one built for a different feature layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_slice(bytes)?;

        let matches = model.feature_names.len() == FEATURE_NAMES.len()
            && model.feature_names.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b);
        if !matches
            || model.standardizer.n_features() != FEATURE_NAMES.len()
            || model.regressor.n_features() != FEATURE_NAMES.len()
        {
            return Err(ModelError::FeatureMismatch {
                stored: model.feature_names,
            });
        }

        Ok(model)
    }
}

/// Trains the boosted regressor on heuristic labels and serves predictions.
///
/// Training takes `&mut self` and prediction `&self`, so a shared predictor can
/// serve concurrent predictions once trained but never while retraining.
pub struct ScorePredictor {
    params: GbmParams,
    model: Option<TrainedModel>,
    version: String,
}

impl ScorePredictor {
    pub fn new(params: GbmParams) -> Self {
        Self {
            params,
            model: None,
            version: "untrained".to_string(),
        }
    }

    pub fn from_model(model: TrainedModel) -> Self {
        let params = model.params().clone();
        let mut predictor = Self::new(params);
        predictor.install(model);
        predictor
    }

    fn install(&mut self, model: TrainedModel) {
        self.version = model.model_id.to_string();
        self.model = Some(model);
    }

    pub fn train(
        &mut self,
        companies: &BTreeMap<String, CompanyData>,
    ) -> Result<&TrainedModel, ModelError> {
        info!("Creating training data from {} companies...", companies.len());
        let training_set = TrainingSet::from_companies(companies);

        let model = TrainedModel::fit(&training_set, self.params.clone())?;
        info!(
            "Model {} trained on {} companies",
            model.model_id, model.training_samples
        );

        self.install(model);
        self.model().ok_or(ModelError::NotTrained)
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn predict(&self, company: &CompanyData) -> Result<f64, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;
        model.predict_features(&FeatureVector::extract(company))
    }

    pub fn feature_importance(&self) -> Result<Vec<(Feature, f64)>, ModelError> {
        self.model
            .as_ref()
            .map(TrainedModel::feature_importance)
            .ok_or(ModelError::NotTrained)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, model.to_bytes()?)?;
        info!("Saved model {} to {:?}", model.model_id, path);
        Ok(())
    }

    /// Replaces the current model with the bundle stored at `path`.
    pub fn load(&mut self, path: &Path) -> Result<(), ModelError> {
        let bytes = std::fs::read(path)?;
        let model = TrainedModel::from_bytes(&bytes).inspect_err(|e| {
            warn!("Rejected model file {:?}: {}", path, e);
        })?;
        info!(
            "Loaded model {} (trained {} on {} companies) from {:?}",
            model.model_id, model.trained_at, model.training_samples, path
        );
        self.params = model.params().clone();
        self.install(model);
        Ok(())
    }
}

impl Default for ScorePredictor {
    fn default() -> Self {
        Self::new(GbmParams::default())
    }
}

impl CreditScorer for ScorePredictor {
    fn score(&self, company: &CompanyData) -> Result<f64, ModelError> {
        self.predict(company)
    }

    fn name(&self) -> &str {
        "Gradient Boosted Trees"
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(current_ratio: f64, roe: f64, debt: f64, margin: f64) -> CompanyData {
        CompanyData::new("Test")
            .with_metric("current_ratio", current_ratio)
            .with_metric("return_on_equity", roe)
            .with_metric("debt_to_equity", debt)
            .with_metric("profit_margin", margin)
    }

    fn three_companies() -> BTreeMap<String, CompanyData> {
        let mut map = BTreeMap::new();
        map.insert("AAA".to_string(), company(2.5, 20.0, 15.0, 25.0));
        map.insert("BBB".to_string(), company(1.2, 8.0, 70.0, 8.0));
        map.insert("CCC".to_string(), company(0.7, 2.0, 180.0, 1.0));
        map
    }

    #[test]
    fn test_predict_before_training_fails() {
        let predictor = ScorePredictor::default();
        assert!(matches!(
            predictor.predict(&CompanyData::default()),
            Err(ModelError::NotTrained)
        ));
        assert!(matches!(
            predictor.feature_importance(),
            Err(ModelError::NotTrained)
        ));
    }

    #[test]
    fn test_two_companies_is_insufficient() {
        let mut companies = three_companies();
        companies.remove("CCC");

        let mut predictor = ScorePredictor::default();
        let err = predictor.train(&companies).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InsufficientData { needed: 3, got: 2 }
        ));
        assert!(!predictor.is_trained());
    }

    #[test]
    fn test_train_and_predict_in_range() {
        let companies = three_companies();
        let mut predictor = ScorePredictor::default();
        predictor.train(&companies).unwrap();

        for data in companies.values() {
            let score = predictor.predict(data).unwrap();
            assert!((0.0..=100.0).contains(&score));
        }

        // Strong company should be learned close to its heuristic label (100 after clamp)
        let strong = predictor.predict(&companies["AAA"]).unwrap();
        let weak = predictor.predict(&companies["CCC"]).unwrap();
        assert!(strong > weak);
    }

    #[test]
    fn test_feature_importance_sorted_descending() {
        let mut predictor = ScorePredictor::default();
        predictor.train(&three_companies()).unwrap();

        let ranked = predictor.feature_importance().unwrap();
        assert_eq!(ranked.len(), FEATURE_NAMES.len());
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_bytes_round_trip_preserves_predictions() {
        let mut predictor = ScorePredictor::default();
        let model = predictor.train(&three_companies()).unwrap();
        let probe = company(1.6, 12.0, 45.0, 12.0);
        let before = model.predict_features(&FeatureVector::extract(&probe)).unwrap();

        let restored = TrainedModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
        let after = restored
            .predict_features(&FeatureVector::extract(&probe))
            .unwrap();
        assert!((before - after).abs() < 1e-9);
        assert_eq!(restored.model_id, model.model_id);
    }

    #[test]
    fn test_from_bytes_rejects_other_feature_layout() {
        let mut predictor = ScorePredictor::default();
        let model = predictor.train(&three_companies()).unwrap();

        let mut bundle: serde_json::Value = serde_json::from_slice(&model.to_bytes().unwrap()).unwrap();
        bundle["feature_names"][0] = serde_json::Value::from("rsi");
        let bytes = serde_json::to_vec(&bundle).unwrap();

        assert!(matches!(
            TrainedModel::from_bytes(&bytes),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_version_tracks_model_id() {
        let mut predictor = ScorePredictor::default();
        assert_eq!(predictor.version(), "untrained");

        let id = predictor.train(&three_companies()).unwrap().model_id;
        assert_eq!(predictor.version(), id.to_string());
    }
}
