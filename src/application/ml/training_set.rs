use crate::domain::company::CompanyData;
use crate::domain::ml::feature_registry::{FEATURE_NAMES, FeatureVector};
use crate::domain::ml::heuristic::heuristic_score;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Features of one company plus its heuristic label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub ticker: String,
    pub features: FeatureVector,
    pub label: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub samples: Vec<TrainingSample>,
}

impl TrainingSet {
    /// Extracts features and labels every company with the heuristic score.
    pub fn from_companies(companies: &BTreeMap<String, CompanyData>) -> Self {
        let samples = companies
            .iter()
            .map(|(ticker, company)| {
                let features = FeatureVector::extract(company);
                TrainingSample {
                    ticker: ticker.clone(),
                    label: heuristic_score(&features),
                    features,
                }
            })
            .collect();

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Row-major feature matrix.
    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.features.to_vec()).collect()
    }

    pub fn labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Writes `ticker,<16 features>,credit_score` rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["ticker"];
        header.extend_from_slice(FEATURE_NAMES);
        header.push("credit_score");
        wtr.write_record(&header)?;

        for sample in &self.samples {
            let mut record = vec![sample.ticker.clone()];
            record.extend(sample.features.values().iter().map(|v| v.to_string()));
            record.push(sample.label.to_string());
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> csv::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        info!("Exported {} training samples to {:?}", self.len(), path);
        Ok(())
    }
}
