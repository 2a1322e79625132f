// Side-by-side scoring of several companies
pub mod comparison;

// Score explanations and recommendations
pub mod explainer;

// Model training, persistence and scoring
pub mod ml;
