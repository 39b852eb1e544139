//! Per-asset-class price resolution.
//!
//! Resolution fails softly: upstream data gaps and unsupported sources
//! yield `Ok(None)` so one bad entry never aborts an aggregate
//! computation. Only transport-level failures surface as errors, and the
//! batch callers catch those per entry as well.

use crate::core::bond;
use crate::core::entry::{AssetDetails, PortfolioEntry, PriceSource};
use crate::core::price::{
    GoldPriceRequest, GoldPriceSource, StockHistoryRequest, StockHistorySource,
};
use anyhow::Result;
use tracing::{debug, warn};

/// The only gold source with supported quote semantics.
pub const GOLD_SOURCE_SJC: &str = "sjc";

/// SJC quotes in VND regardless of the currency stated on the entry.
pub const GOLD_QUOTE_CURRENCY: &str = "VND";

/// A price in the currency it is quoted in, tagged with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedPrice {
    pub price: f64,
    pub currency: String,
    pub source: PriceSource,
}

/// Resolves the current market price of an entry.
///
/// `now` is the end of the 1-day quote window (unix seconds) and the
/// valuation instant for bond math.
pub async fn resolve_current_price(
    entry: &PortfolioEntry,
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    now: i64,
) -> Result<Option<ResolvedPrice>> {
    match &entry.asset {
        AssetDetails::Stock { source } => {
            resolve_stock_price(entry, source.as_deref(), stock_source, now).await
        }
        AssetDetails::Gold { source, .. } => {
            resolve_gold_price(entry, source.as_deref(), gold_source, now).await
        }
        AssetDetails::Bond { .. } => Ok(Some(resolve_bond_price(entry, now))),
    }
}

/// Resolves a quoted price as of an arbitrary timestamp.
///
/// Bonds have no quote feed and are not supported on this path.
pub async fn resolve_price_at(
    entry: &PortfolioEntry,
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    at: i64,
) -> Result<Option<ResolvedPrice>> {
    match &entry.asset {
        AssetDetails::Stock { source } => {
            resolve_stock_price(entry, source.as_deref(), stock_source, at).await
        }
        AssetDetails::Gold { source, .. } => {
            resolve_gold_price(entry, source.as_deref(), gold_source, at).await
        }
        AssetDetails::Bond { .. } => Ok(None),
    }
}

async fn resolve_stock_price(
    entry: &PortfolioEntry,
    source: Option<&str>,
    stock_source: &dyn StockHistorySource,
    at: i64,
) -> Result<Option<ResolvedPrice>> {
    let request = StockHistoryRequest::daily_window(&entry.symbol, at, source);
    let response = stock_source.fetch_history(&request).await?;

    if !response.is_ok() {
        warn!(
            symbol = %entry.symbol,
            error = response.error.as_deref().unwrap_or("unknown"),
            "Stock history request failed, skipping entry"
        );
        return Ok(None);
    }

    let Some(close) = response.last_close() else {
        debug!(symbol = %entry.symbol, at, "No candle in window");
        return Ok(None);
    };
    if close <= 0.0 {
        return Ok(None);
    }

    Ok(Some(ResolvedPrice {
        price: close * response.price_scale(),
        currency: entry.currency.clone(),
        source: PriceSource::Provider(response.source),
    }))
}

async fn resolve_gold_price(
    entry: &PortfolioEntry,
    source: Option<&str>,
    gold_source: &dyn GoldPriceSource,
    at: i64,
) -> Result<Option<ResolvedPrice>> {
    if source != Some(GOLD_SOURCE_SJC) {
        warn!(
            symbol = %entry.symbol,
            source = source.unwrap_or("none"),
            "Unsupported gold source, skipping entry"
        );
        return Ok(None);
    }

    let request = GoldPriceRequest::daily_window(&entry.symbol, at, source);
    let response = gold_source.fetch_history(&request).await?;

    if !response.is_ok() {
        warn!(
            gold_price_id = %entry.symbol,
            error = response.error.as_deref().unwrap_or("unknown"),
            "Gold price request failed, skipping entry"
        );
        return Ok(None);
    }

    let Some(sell) = response.last_sell() else {
        debug!(gold_price_id = %entry.symbol, at, "No gold quote in window");
        return Ok(None);
    };
    if sell <= 0.0 {
        return Ok(None);
    }

    Ok(Some(ResolvedPrice {
        price: sell * response.price_scale(),
        // SJC quotes in VND, whatever the entry says.
        currency: GOLD_QUOTE_CURRENCY.to_string(),
        source: PriceSource::Provider(response.source),
    }))
}

/// Bond pricing fallback chain: calculated present value, then manual
/// override, then face value, then purchase price as last resort.
fn resolve_bond_price(entry: &PortfolioEntry, now: i64) -> ResolvedPrice {
    let AssetDetails::Bond {
        face_value,
        coupon_rate,
        ytm,
        maturity_date,
        coupon_frequency,
        current_market_price,
        ..
    } = &entry.asset
    else {
        unreachable!("resolve_bond_price called on a non-bond entry");
    };

    let tagged = |price, source| ResolvedPrice {
        price,
        currency: entry.currency.clone(),
        source,
    };

    if let (Some(fv), Some(rate), Some(ytm), Some(maturity), Some(frequency)) =
        (*face_value, *coupon_rate, *ytm, *maturity_date, *coupon_frequency)
    {
        let pv = bond::present_value(fv, rate, ytm, maturity, frequency, now);
        if pv.is_finite() {
            return tagged(pv, PriceSource::Calculated);
        }
        warn!(
            symbol = %entry.symbol,
            "Bond present value is not finite, falling back"
        );
    }

    if let Some(market_price) = current_market_price.filter(|p| *p > 0.0) {
        return tagged(market_price, PriceSource::Manual);
    }

    if let Some(fv) = *face_value {
        return tagged(fv, PriceSource::FaceValue);
    }

    tagged(entry.purchase_price, PriceSource::Unknown)
}
