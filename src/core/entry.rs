//! Portfolio entry model shared by the valuation and history paths.
//!
//! Entries are owned by the embedding application (persistence is out of
//! scope); the engine only reads them. Per-asset-class fields live on the
//! [`AssetDetails`] variants so a stock can never carry bond pricing data.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Gold weight units accepted on entries.
///
/// Only gram, mace and tael have defined conversion factors; see
/// [`crate::core::units`] for how ounce and kilogram are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldUnit {
    Gram,
    Mace,
    Tael,
    Ounce,
    #[serde(rename = "kg")]
    Kilogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponFrequency {
    Annual,
    #[serde(rename = "semiannual")]
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl CouponFrequency {
    pub fn periods_per_year(&self) -> f64 {
        match self {
            CouponFrequency::Annual => 1.0,
            CouponFrequency::SemiAnnual => 2.0,
            CouponFrequency::Quarterly => 4.0,
            CouponFrequency::Monthly => 12.0,
        }
    }
}

/// Asset-class specific fields of an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "asset_type", rename_all = "lowercase")]
pub enum AssetDetails {
    Stock {
        /// Data-provider identifier (e.g. "vndirect", "yahoo"). The data
        /// service picks its default source when absent.
        source: Option<String>,
    },
    Gold {
        /// Weight unit the quantity and purchase price are stated in.
        /// Defaults to tael when absent.
        unit: Option<GoldUnit>,
        /// Only "sjc" is currently supported; entries with any other
        /// source are skipped rather than priced.
        source: Option<String>,
    },
    Bond {
        face_value: Option<f64>,
        /// Coupon rate in percent per annum.
        coupon_rate: Option<f64>,
        /// Yield to maturity in percent per annum.
        ytm: Option<f64>,
        /// Unix seconds.
        maturity_date: Option<i64>,
        coupon_frequency: Option<CouponFrequency>,
        /// Manual price override, used when the bond cannot be priced
        /// from its cash flows.
        current_market_price: Option<f64>,
        /// Unix seconds of the last manual price update.
        last_price_update: Option<i64>,
    },
}

/// One holding as stored by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub id: String,
    pub portfolio_id: String,
    /// Ticker, gold-type identifier, or bond identifier/ISIN.
    pub symbol: String,
    /// Shares, weight-units, or bond count.
    pub quantity: f64,
    /// Price paid per share / per weight-unit / per bond.
    pub purchase_price: f64,
    /// Unix seconds.
    pub purchase_date: i64,
    /// Currency the purchase price and fees are stated in.
    pub currency: String,
    pub transaction_fees: Option<f64>,
    #[serde(flatten)]
    pub asset: AssetDetails,
}

impl PortfolioEntry {
    pub fn is_bond(&self) -> bool {
        matches!(self.asset, AssetDetails::Bond { .. })
    }
}

/// Where a resolved price came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Bond present value computed from its cash flows.
    Calculated,
    /// Manual market-price override on the entry.
    Manual,
    /// Bond face value used as-is.
    FaceValue,
    /// Quote provider name (stock and gold entries).
    Provider(String),
    /// Last-resort fallback (purchase price).
    Unknown,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::Calculated => write!(f, "calculated"),
            PriceSource::Manual => write!(f, "manual"),
            PriceSource::FaceValue => write!(f, "face_value"),
            PriceSource::Provider(name) => write!(f, "{name}"),
            PriceSource::Unknown => write!(f, "unknown"),
        }
    }
}
