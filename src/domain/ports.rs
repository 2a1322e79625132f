use crate::domain::company::CompanyData;
use crate::domain::errors::DataError;

/// Source of raw company data, keyed by ticker.
pub trait CompanyDataSource: Send + Sync {
    /// `Ok(None)` when the source has no record for the ticker.
    fn fetch(&self, ticker: &str) -> Result<Option<CompanyData>, DataError>;

    /// Tickers this source can serve.
    fn tickers(&self) -> Vec<String>;
}
