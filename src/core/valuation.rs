//! Entry valuation and portfolio aggregation.

use crate::core::coupons::CouponSource;
use crate::core::currency::CurrencyConverter;
use crate::core::entry::{AssetDetails, GoldUnit, PortfolioEntry, PriceSource};
use crate::core::price::{GoldPriceSource, StockHistorySource};
use crate::core::resolver::resolve_current_price;
use crate::core::units;
use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cap on in-flight provider requests during batch fan-out.
pub const MAX_CONCURRENT_FETCHES: usize = 4;

/// Valuation of a single entry, all monetary fields in the display
/// currency. Recomputed on every call, never persisted.
#[derive(Debug, Clone)]
pub struct EntryPerformance {
    pub entry: PortfolioEntry,
    /// Current price per canonical unit.
    pub current_price: f64,
    /// Purchase price per canonical unit.
    pub purchase_price: f64,
    pub current_value: f64,
    pub total_cost: f64,
    /// Includes realized coupon income for bonds.
    pub gain_loss: f64,
    pub gain_loss_percentage: f64,
    /// Display currency all fields are stated in.
    pub currency: String,
    /// Quote-currency to display-currency rate applied to the current
    /// price; 1.0 when no conversion happened.
    pub exchange_rate: f64,
    pub price_source: PriceSource,
}

#[derive(Debug, Clone)]
pub struct PortfolioPerformance {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percentage: f64,
    pub currency: String,
    pub entries: Vec<EntryPerformance>,
}

/// Values every entry and folds the survivors into portfolio totals.
///
/// Per-entry failures are logged and skipped; `None` is returned when the
/// input is empty, every entry failed, or `cancel` fired. Provider
/// requests fan out in chunks of `max_concurrent` (clamped to at least
/// 1); [`MAX_CONCURRENT_FETCHES`] is the usual choice, overridable via
/// `AppConfig::fan_out_chunk_size`.
pub async fn calculate_portfolio_performance(
    entries: &[PortfolioEntry],
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    currency_converter: &dyn CurrencyConverter,
    coupon_source: &dyn CouponSource,
    display_currency: &str,
    max_concurrent: usize,
    cancel: &CancellationToken,
) -> Option<PortfolioPerformance> {
    let now = Utc::now().timestamp();
    let mut performances = Vec::new();

    for chunk in entries.chunks(max_concurrent.max(1)) {
        if cancel.is_cancelled() {
            warn!("Portfolio valuation cancelled");
            return None;
        }

        let results = join_all(chunk.iter().map(|entry| {
            valuate_entry(
                entry,
                stock_source,
                gold_source,
                currency_converter,
                coupon_source,
                display_currency,
                now,
            )
        }))
        .await;

        for (entry, result) in chunk.iter().zip(results) {
            match result {
                Ok(Some(performance)) => performances.push(performance),
                Ok(None) => {}
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "Failed to value entry, skipping");
                }
            }
        }
    }

    aggregate(performances, display_currency)
}

/// Values one entry at the given instant.
///
/// Returns `Ok(None)` when the entry cannot be priced (no quote, an
/// unsupported gold source or weight unit); only conversion and transport
/// failures surface as errors.
pub async fn valuate_entry(
    entry: &PortfolioEntry,
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    currency_converter: &dyn CurrencyConverter,
    coupon_source: &dyn CouponSource,
    display_currency: &str,
    now: i64,
) -> Result<Option<EntryPerformance>> {
    let Some(resolved) = resolve_current_price(entry, stock_source, gold_source, now).await? else {
        return Ok(None);
    };

    // Gold quantities and purchase prices are stated per weight-unit and
    // must be rescaled to the canonical tael before any multiplication.
    let (purchase_native, quantity) = match &entry.asset {
        AssetDetails::Gold { unit, .. } => {
            let unit = unit.unwrap_or(GoldUnit::Tael);
            let scaled = units::price_per_tael(entry.purchase_price, unit)
                .and_then(|price| Ok((price, units::quantity_in_tael(entry.quantity, unit)?)));
            match scaled {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "Skipping gold entry");
                    return Ok(None);
                }
            }
        }
        _ => (entry.purchase_price, entry.quantity),
    };

    let current_price = convert_amount(
        currency_converter,
        resolved.price,
        &resolved.currency,
        display_currency,
    )
    .await?;
    let exchange_rate = if resolved.currency == display_currency || resolved.price == 0.0 {
        1.0
    } else {
        current_price / resolved.price
    };

    let purchase_price = convert_amount(
        currency_converter,
        purchase_native,
        &entry.currency,
        display_currency,
    )
    .await?;
    let fees = match entry.transaction_fees {
        Some(fees) if fees != 0.0 => {
            convert_amount(currency_converter, fees, &entry.currency, display_currency).await?
        }
        _ => 0.0,
    };

    let current_value = current_price * quantity;
    let total_cost = purchase_price * quantity + fees;

    let coupon_income = if entry.is_bond() {
        coupon_income(entry, coupon_source, currency_converter, display_currency).await
    } else {
        0.0
    };

    // Coupon income is realized cash: it counts toward gain/loss but not
    // toward the mark-to-market value.
    let gain_loss = current_value - total_cost + coupon_income;
    let gain_loss_percentage = if total_cost != 0.0 {
        gain_loss / total_cost * 100.0
    } else {
        0.0
    };

    debug!(
        entry_id = %entry.id,
        current_value,
        total_cost,
        gain_loss,
        source = %resolved.source,
        "Valued entry"
    );

    Ok(Some(EntryPerformance {
        entry: entry.clone(),
        current_price,
        purchase_price,
        current_value,
        total_cost,
        gain_loss,
        gain_loss_percentage,
        currency: display_currency.to_string(),
        exchange_rate,
        price_source: resolved.source,
    }))
}

/// Pure fold of entry valuations into portfolio totals.
///
/// Totals are derived from the summed values, never by summing per-entry
/// percentages. Empty input yields `None`.
pub fn aggregate(
    performances: Vec<EntryPerformance>,
    display_currency: &str,
) -> Option<PortfolioPerformance> {
    if performances.is_empty() {
        return None;
    }

    let total_value: f64 = performances.iter().map(|p| p.current_value).sum();
    let total_cost: f64 = performances.iter().map(|p| p.total_cost).sum();
    let total_gain_loss: f64 = performances.iter().map(|p| p.gain_loss).sum();
    let total_gain_loss_percentage = if total_cost != 0.0 {
        total_gain_loss / total_cost * 100.0
    } else {
        0.0
    };

    Some(PortfolioPerformance {
        total_value,
        total_cost,
        total_gain_loss,
        total_gain_loss_percentage,
        currency: display_currency.to_string(),
        entries: performances,
    })
}

async fn convert_amount(
    currency_converter: &dyn CurrencyConverter,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<f64> {
    if from == to {
        return Ok(amount);
    }
    currency_converter.convert(amount, from, to).await
}

async fn coupon_income(
    entry: &PortfolioEntry,
    coupon_source: &dyn CouponSource,
    currency_converter: &dyn CurrencyConverter,
    display_currency: &str,
) -> f64 {
    let payments = match coupon_source.list_payments(&entry.id).await {
        Ok(payments) => payments,
        Err(e) => {
            warn!(entry_id = %entry.id, error = %e, "Failed to list coupon payments");
            return 0.0;
        }
    };

    let mut income = 0.0;
    for payment in payments {
        match convert_amount(
            currency_converter,
            payment.amount,
            &payment.currency,
            display_currency,
        )
        .await
        {
            Ok(amount) => income += amount,
            Err(e) => {
                warn!(entry_id = %entry.id, error = %e, "Failed to convert coupon payment");
            }
        }
    }
    income
}
