use crate::domain::company::CompanyData;
use crate::domain::errors::DataError;
use crate::domain::ports::CompanyDataSource;
use crate::infrastructure::cache::TtlCache;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Company records loaded from a JSON object keyed by ticker.
#[derive(Debug, Clone, Default)]
pub struct JsonCompanyStore {
    companies: BTreeMap<String, CompanyData>,
}

impl JsonCompanyStore {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&text).map_err(|source| DataError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded {} companies from {:?}", store.companies.len(), path);
        Ok(store)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut companies: BTreeMap<String, CompanyData> = serde_json::from_str(text)?;
        for (ticker, company) in companies.iter_mut() {
            company.ticker.get_or_insert_with(|| ticker.clone());
        }
        Ok(Self { companies })
    }

    pub fn from_companies(companies: BTreeMap<String, CompanyData>) -> Self {
        Self { companies }
    }
}

impl CompanyDataSource for JsonCompanyStore {
    fn fetch(&self, ticker: &str) -> Result<Option<CompanyData>, DataError> {
        Ok(self.companies.get(ticker).cloned())
    }

    fn tickers(&self) -> Vec<String> {
        self.companies.keys().cloned().collect()
    }
}

/// Wraps a source with a TTL cache of fetched records.
pub struct CachedSource<S> {
    inner: S,
    cache: TtlCache<String, CompanyData>,
}

impl<S: CompanyDataSource> CachedSource<S> {
    pub fn new(inner: S, cache: TtlCache<String, CompanyData>) -> Self {
        Self { inner, cache }
    }

    /// Drops the cached record so the next fetch hits the source again.
    pub fn invalidate(&self, ticker: &str) -> bool {
        self.cache.invalidate(&ticker.to_string())
    }

    /// Fetches every ticker the source knows about among `tickers`, skipping
    /// the ones it has no record for.
    pub fn fetch_many(&self, tickers: &[String]) -> Result<BTreeMap<String, CompanyData>, DataError> {
        let mut found = BTreeMap::new();
        for ticker in tickers {
            match self.fetch(ticker)? {
                Some(company) => {
                    found.insert(ticker.clone(), company);
                }
                None => tracing::warn!("No data available for {}, skipping", ticker),
            }
        }
        Ok(found)
    }
}

impl<S: CompanyDataSource> CompanyDataSource for CachedSource<S> {
    fn fetch(&self, ticker: &str) -> Result<Option<CompanyData>, DataError> {
        let key = ticker.to_string();
        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for {}", ticker);
            return Ok(Some(hit));
        }

        let fetched = self.inner.fetch(ticker)?;
        if let Some(company) = &fetched {
            self.cache.insert(key, company.clone());
        }
        Ok(fetched)
    }

    fn tickers(&self) -> Vec<String> {
        self.inner.tickers()
    }
}
