// Company records as loaded from the data source
pub mod company;

// Domain-specific error types
pub mod errors;

// Explanation report types
pub mod explanation;

// Features, heuristic labelling and the boosted regressor
pub mod ml;

// Port interfaces
pub mod ports;

// News sentiment types
pub mod sentiment;
