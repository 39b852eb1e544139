//! Concrete HTTP clients for the quote and currency traits.

pub mod caching;
pub mod fincatch;
pub mod yahoo_rates;

// Re-export the clients embedders wire together
pub use caching::{CachingCurrencyConverter, CachingGoldSource, CachingStockSource};
pub use fincatch::FinCatchClient;
pub use yahoo_rates::YahooCurrencyConverter;
