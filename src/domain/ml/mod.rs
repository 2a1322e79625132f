pub mod feature_registry;
pub mod gradient_boosting;
pub mod heuristic;
pub mod standardizer;
pub mod thresholds;
