use thiserror::Error;

/// Errors raised by model training, inference and persistence
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Insufficient training data: need at least {needed} companies, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Model not trained: train or load a model first")]
    NotTrained,

    #[error("Feature mismatch: stored model features {stored:?} differ from the current feature set")]
    FeatureMismatch { stored: Vec<String> },

    #[error("Training failed: {reason}")]
    Training { reason: String },

    #[error("Prediction failed: {reason}")]
    Prediction { reason: String },

    #[error("Model serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading company data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read company data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid company data in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by multi-company analyses
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Comparison needs at least {needed} companies, got {got}")]
    InsufficientCompanies { needed: usize, got: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}
