//! Valuation and performance engine for mixed portfolios of stocks,
//! physical gold and bonds.
//!
//! The engine is a pure computation library: entries come from the
//! embedding application, quotes and FX rates come from collaborator
//! traits ([`core::price::StockHistorySource`],
//! [`core::price::GoldPriceSource`], [`core::currency::CurrencyConverter`],
//! [`core::coupons::CouponSource`]), and nothing is persisted. Concrete
//! HTTP clients for the fin-catch data service and Yahoo's chart API live
//! in [`providers`].
//!
//! Three operations are exposed: current portfolio valuation, a single
//! holding's base-100 performance series, and the series of every holding
//! at once. Per-entry failures are logged and skipped so one dead symbol
//! never takes down a portfolio-wide result.

pub mod cache;
pub mod config;
pub mod core;
pub mod log;
pub mod providers;

pub use crate::core::coupons::{CouponPayment, CouponSource, NoCoupons};
pub use crate::core::currency::CurrencyConverter;
pub use crate::core::entry::{
    AssetDetails, CouponFrequency, GoldUnit, PortfolioEntry, PriceSource,
};
pub use crate::core::history::{
    calculate_all_holdings_performance, calculate_holding_performance, HoldingPerformance,
    PerformancePoint, PortfolioHoldingsPerformance,
};
pub use crate::core::price::{GoldPriceSource, StockHistorySource};
pub use crate::core::valuation::{
    calculate_portfolio_performance, EntryPerformance, PortfolioPerformance,
    MAX_CONCURRENT_FETCHES,
};
