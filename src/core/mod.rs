//! Core abstractions and valuation math.

pub mod bond;
pub mod coupons;
pub mod currency;
pub mod entry;
pub mod history;
pub mod price;
pub mod resolver;
pub mod units;
pub mod valuation;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use coupons::{CouponPayment, CouponSource, NoCoupons};
pub use currency::CurrencyConverter;
pub use entry::{AssetDetails, CouponFrequency, GoldUnit, PortfolioEntry, PriceSource};
pub use price::{GoldPriceSource, StockHistorySource};
pub use resolver::ResolvedPrice;
