pub mod predictor;
pub mod score_predictor;
pub mod training_set;
