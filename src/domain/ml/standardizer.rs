use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-feature affine transform `(x - mean) / scale`, fit once and frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Standardizer {
    /// Fit on a row-major matrix. Constant columns get a scale of 1.0.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, ModelError> {
        let n_features = rows.first().map(Vec::len).ok_or_else(|| ModelError::Training {
            reason: "cannot fit standardizer on an empty matrix".to_string(),
        })?;

        if rows.iter().any(|row| row.len() != n_features) {
            return Err(ModelError::Training {
                reason: "ragged feature matrix".to_string(),
            });
        }

        let mut mean = Vec::with_capacity(n_features);
        let mut scale = Vec::with_capacity(n_features);

        for j in 0..n_features {
            // population statistics (ddof = 0)
            let column: Vec<f64> = rows.iter().map(|row| row[j]).collect();
            let column_mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();

            mean.push(if column_mean.is_finite() { column_mean } else { 0.0 });
            scale.push(if std_dev.is_finite() && std_dev > 0.0 {
                std_dev
            } else {
                1.0
            });
        }

        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features() {
            return Err(ModelError::Prediction {
                reason: format!(
                    "expected {} features, got {}",
                    self.n_features(),
                    row.len()
                ),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
