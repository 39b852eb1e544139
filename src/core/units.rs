//! Gold weight-unit conversion.
//!
//! The SJC quote feed prices everything per tael regardless of the gold
//! type, so the tael is the canonical unit: quantities are converted down
//! into tael and per-unit prices are scaled up to per-tael before any
//! valuation math runs.

use crate::core::entry::GoldUnit;
use anyhow::{bail, Result};

/// 1 tael = 10 mace = 37.5 grams.
const MACE_PER_TAEL: f64 = 10.0;
const GRAMS_PER_TAEL: f64 = 37.5;

/// Converts a quantity stated in `unit` into tael.
///
/// Ounce and kilogram are listed on entries but have no defined factor in
/// the conversion table; callers are expected to skip such entries.
pub fn quantity_in_tael(quantity: f64, unit: GoldUnit) -> Result<f64> {
    match unit {
        GoldUnit::Tael => Ok(quantity),
        GoldUnit::Mace => Ok(quantity / MACE_PER_TAEL),
        GoldUnit::Gram => Ok(quantity / GRAMS_PER_TAEL),
        GoldUnit::Ounce | GoldUnit::Kilogram => {
            bail!("No conversion factor defined for gold unit {unit:?}")
        }
    }
}

/// Converts a price-per-`unit` into a price-per-tael.
///
/// Inverse direction of [`quantity_in_tael`]: a price per mace multiplies
/// by 10, a price per gram by 37.5.
pub fn price_per_tael(price: f64, unit: GoldUnit) -> Result<f64> {
    match unit {
        GoldUnit::Tael => Ok(price),
        GoldUnit::Mace => Ok(price * MACE_PER_TAEL),
        GoldUnit::Gram => Ok(price * GRAMS_PER_TAEL),
        GoldUnit::Ounce | GoldUnit::Kilogram => {
            bail!("No conversion factor defined for gold unit {unit:?}")
        }
    }
}
