//! Least-squares gradient boosting over smartcore regression trees.

use crate::domain::errors::ModelError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use tracing::{debug, info};

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Boosting stops once every residual is below this magnitude.
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// GBM hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: u16,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f64,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) for each tree
    pub subsample: f64,
    /// Seed for row subsampling, fixed for reproducible fits
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl GbmParams {
    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::Training {
                reason: "n_estimators must be at least 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::Training {
                reason: format!("invalid learning rate {}", self.learning_rate),
            });
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::Training {
                reason: format!("subsample must be in (0, 1], got {}", self.subsample),
            });
        }
        Ok(())
    }
}

/// Fitted boosted ensemble: `init + learning_rate * sum(tree(x))`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    params: GbmParams,
    init: f64,
    trees: Vec<Tree>,
    n_features: usize,
    importances: Vec<f64>,
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, String> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| format!("Matrix error: {}", e))
}

impl GradientBoostedRegressor {
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: GbmParams) -> Result<Self, ModelError> {
        params.validate()?;

        if rows.is_empty() || rows.len() != targets.len() {
            return Err(ModelError::Training {
                reason: format!(
                    "{} feature rows for {} targets",
                    rows.len(),
                    targets.len()
                ),
            });
        }

        let n_samples = rows.len();
        let n_features = rows[0].len();
        let x = to_matrix(rows).map_err(|reason| ModelError::Training { reason })?;

        let init = targets.iter().sum::<f64>() / n_samples as f64;
        let mut fitted = vec![init; n_samples];
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let sample_size = ((n_samples as f64 * params.subsample).round() as usize).clamp(1, n_samples);

        info!(
            "Training boosted regressor: {} samples, {} features, {} rounds (depth {}, lr {})",
            n_samples, n_features, params.n_estimators, params.max_depth, params.learning_rate
        );

        for round in 0..params.n_estimators {
            let residuals: Vec<f64> = targets.iter().zip(&fitted).map(|(y, f)| y - f).collect();

            if residuals.iter().all(|r| r.abs() < RESIDUAL_TOLERANCE) {
                debug!("Residuals vanished after {} rounds, stopping early", round);
                break;
            }

            let tree = if sample_size < n_samples {
                let picked = rand::seq::index::sample(&mut rng, n_samples, sample_size).into_vec();
                let sub_rows: Vec<Vec<f64>> = picked.iter().map(|&i| rows[i].clone()).collect();
                let sub_residuals: Vec<f64> = picked.iter().map(|&i| residuals[i]).collect();
                let sub_x = to_matrix(&sub_rows).map_err(|reason| ModelError::Training { reason })?;
                Tree::fit(&sub_x, &sub_residuals, params.tree_parameters())
            } else {
                Tree::fit(&x, &residuals, params.tree_parameters())
            }
            .map_err(|e| ModelError::Training {
                reason: format!("tree {} failed: {}", round, e),
            })?;

            let step = tree.predict(&x).map_err(|e| ModelError::Training {
                reason: format!("tree {} predict failed: {}", round, e),
            })?;
            for (f, s) in fitted.iter_mut().zip(&step) {
                *f += params.learning_rate * s;
            }
            trees.push(tree);
        }

        let mut model = Self {
            params,
            init,
            trees,
            n_features,
            importances: Vec::new(),
        };
        model.importances = model.sensitivity(rows)?;

        info!("Boosted regressor trained with {} trees", model.trees.len());
        Ok(model)
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if let Some(row) = rows.iter().find(|row| row.len() != self.n_features) {
            return Err(ModelError::Prediction {
                reason: format!("expected {} features, got {}", self.n_features, row.len()),
            });
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let x = to_matrix(rows).map_err(|reason| ModelError::Prediction { reason })?;
        let mut output = vec![self.init; rows.len()];

        for tree in &self.trees {
            let step = tree.predict(&x).map_err(|e| ModelError::Prediction {
                reason: e.to_string(),
            })?;
            for (o, s) in output.iter_mut().zip(&step) {
                *o += self.params.learning_rate * s;
            }
        }

        Ok(output)
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.predict(&[row.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Prediction {
                reason: "no prediction returned".to_string(),
            })
    }

    /// Mean absolute output shift when each feature is pinned to 0.0 (the
    /// standardized mean), normalized to sum to 1.
    fn sensitivity(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let baseline = self.predict(rows)?;
        let mut raw = Vec::with_capacity(self.n_features);

        for j in 0..self.n_features {
            let pinned: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| {
                    let mut row = row.clone();
                    row[j] = 0.0;
                    row
                })
                .collect();
            let shifted = self.predict(&pinned)?;
            let shift = baseline
                .iter()
                .zip(&shifted)
                .map(|(a, b)| (a - b).abs())
                .sum::<f64>()
                / rows.len() as f64;
            raw.push(shift);
        }

        let total: f64 = raw.iter().sum();
        if total > 0.0 {
            Ok(raw.iter().map(|v| v / total).collect())
        } else {
            Ok(raw)
        }
    }

    /// Per-feature importance in input column order.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
