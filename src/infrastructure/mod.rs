pub mod cache;
pub mod company_store;
pub mod news;

pub use cache::TtlCache;
pub use company_store::{CachedSource, JsonCompanyStore};
