//! Data layer — providers, the CSV bar cache, and the validation funnel.

pub mod cache;
pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use cache::BarCache;
pub use ingest::ingest;
pub use provider::{DataError, DataProvider, RawBar};
pub use yahoo::YahooProvider;
