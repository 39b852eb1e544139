//! Currency conversion abstraction.

use anyhow::Result;
use async_trait::async_trait;

/// Converts a scalar amount between two currency codes at current rates.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64>;
}
