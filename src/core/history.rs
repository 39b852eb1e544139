//! Base-100 historical performance curves.
//!
//! Each holding's price series is normalized to 100 at its purchase date
//! so holdings of wildly different absolute prices (a 20k VND share vs. a
//! 21M VND tael of gold) can share one chart.

use crate::core::currency::CurrencyConverter;
use crate::core::entry::{AssetDetails, GoldUnit, PortfolioEntry};
use crate::core::price::{GoldPriceSource, StockHistorySource};
use crate::core::resolver::resolve_price_at;
use crate::core::units;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const DAY_SECS: i64 = 86_400;

/// Chart colors cycled over holdings; purely cosmetic.
const CHART_PALETTE: [&str; 8] = [
    "#36a2eb", "#ff6384", "#4bc0c0", "#ffcd56", "#9966ff", "#ff9f40", "#c9cbcf", "#2ecc71",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    /// Unix seconds.
    pub timestamp: i64,
    /// Base-100 index relative to the purchase-date baseline.
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct HoldingPerformance {
    pub entry: PortfolioEntry,
    pub points: Vec<PerformancePoint>,
    /// Last index value minus 100.
    pub current_return: f64,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct PortfolioHoldingsPerformance {
    pub holdings: Vec<HoldingPerformance>,
    pub currency: String,
}

/// Builds the normalized price series of one holding.
///
/// Points start at `max(start_date, purchase_date)`, step `interval_days`
/// apart and always include `end_date`. Timestamps with no resolvable
/// price are skipped. Bonds have no quote feed and yield an empty series,
/// as does any holding whose baseline cannot be computed.
pub async fn calculate_holding_performance(
    entry: &PortfolioEntry,
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    currency_converter: &dyn CurrencyConverter,
    start_date: i64,
    end_date: i64,
    display_currency: &str,
    interval_days: i64,
) -> Vec<PerformancePoint> {
    if entry.is_bond() {
        warn!(entry_id = %entry.id, "Bonds are not supported in historical charts");
        return Vec::new();
    }

    // A holding has no performance before it existed.
    let effective_start = start_date.max(entry.purchase_date);
    if effective_start > end_date {
        return Vec::new();
    }

    let Some(baseline) = purchase_baseline(entry, currency_converter, display_currency).await
    else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for timestamp in series_timestamps(effective_start, end_date, interval_days) {
        let resolved = match resolve_price_at(entry, stock_source, gold_source, timestamp).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => continue,
            Err(e) => {
                warn!(entry_id = %entry.id, timestamp, error = %e, "Price fetch failed, skipping point");
                continue;
            }
        };

        let price = if resolved.currency == display_currency {
            resolved.price
        } else {
            match currency_converter
                .convert(resolved.price, &resolved.currency, display_currency)
                .await
            {
                Ok(price) => price,
                Err(e) => {
                    warn!(entry_id = %entry.id, timestamp, error = %e, "Conversion failed, skipping point");
                    continue;
                }
            }
        };

        let value = if baseline > 0.0 {
            price / baseline * 100.0
        } else {
            100.0
        };
        points.push(PerformancePoint { timestamp, value });
    }

    debug!(entry_id = %entry.id, points = points.len(), "Built holding series");
    points
}

/// Builds normalized series for every entry and assigns chart colors.
///
/// Holdings that produce no points (bonds, unpriceable entries) are left
/// out entirely; `None` is returned when nothing survives or `cancel`
/// fired. Series are built `max_concurrent` holdings at a time (clamped
/// to at least 1).
pub async fn calculate_all_holdings_performance(
    entries: &[PortfolioEntry],
    stock_source: &dyn StockHistorySource,
    gold_source: &dyn GoldPriceSource,
    currency_converter: &dyn CurrencyConverter,
    start_date: i64,
    end_date: i64,
    display_currency: &str,
    max_concurrent: usize,
    cancel: &CancellationToken,
) -> Option<PortfolioHoldingsPerformance> {
    let mut holdings = Vec::new();

    for chunk in entries.chunks(max_concurrent.max(1)) {
        if cancel.is_cancelled() {
            warn!("Holdings performance calculation cancelled");
            return None;
        }

        let series = join_all(chunk.iter().map(|entry| {
            calculate_holding_performance(
                entry,
                stock_source,
                gold_source,
                currency_converter,
                start_date,
                end_date,
                display_currency,
                1,
            )
        }))
        .await;

        for (entry, points) in chunk.iter().zip(series) {
            let Some(last) = points.last() else {
                continue;
            };
            let current_return = last.value - 100.0;
            let color = CHART_PALETTE[holdings.len() % CHART_PALETTE.len()].to_string();
            holdings.push(HoldingPerformance {
                entry: entry.clone(),
                points,
                current_return,
                color,
            });
        }
    }

    if holdings.is_empty() {
        return None;
    }

    Some(PortfolioHoldingsPerformance {
        holdings,
        currency: display_currency.to_string(),
    })
}

/// Stepped timestamps from `start` to `end` inclusive; `end` is appended
/// when the stepping does not land on it exactly.
fn series_timestamps(start: i64, end: i64, interval_days: i64) -> Vec<i64> {
    let step = interval_days.max(1) * DAY_SECS;
    let mut timestamps = Vec::new();
    let mut timestamp = start;
    while timestamp <= end {
        timestamps.push(timestamp);
        timestamp += step;
    }
    if timestamps.last() != Some(&end) {
        timestamps.push(end);
    }
    timestamps
}

/// Purchase price per canonical unit in the display currency, the 100
/// mark of the series.
async fn purchase_baseline(
    entry: &PortfolioEntry,
    currency_converter: &dyn CurrencyConverter,
    display_currency: &str,
) -> Option<f64> {
    let native = match &entry.asset {
        AssetDetails::Gold { unit, .. } => {
            match units::price_per_tael(entry.purchase_price, unit.unwrap_or(GoldUnit::Tael)) {
                Ok(price) => price,
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "Skipping gold holding");
                    return None;
                }
            }
        }
        _ => entry.purchase_price,
    };

    if entry.currency == display_currency {
        return Some(native);
    }
    match currency_converter
        .convert(native, &entry.currency, display_currency)
        .await
    {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            warn!(entry_id = %entry.id, error = %e, "Baseline conversion failed, skipping holding");
            None
        }
    }
}
