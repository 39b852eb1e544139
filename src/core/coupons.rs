//! Coupon payment lookup.
//!
//! Coupon payments are recorded by the embedding application; the engine
//! only reads them back as realized income for bond entries.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponPayment {
    pub entry_id: String,
    pub amount: f64,
    pub currency: String,
    /// Unix seconds.
    pub payment_date: i64,
}

#[async_trait]
pub trait CouponSource: Send + Sync {
    async fn list_payments(&self, entry_id: &str) -> Result<Vec<CouponPayment>>;
}

/// A coupon source with no payments, for callers without a coupon feed.
pub struct NoCoupons;

#[async_trait]
impl CouponSource for NoCoupons {
    async fn list_payments(&self, _entry_id: &str) -> Result<Vec<CouponPayment>> {
        Ok(Vec::new())
    }
}
