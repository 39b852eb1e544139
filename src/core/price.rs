//! Market-data abstractions and wire models.
//!
//! The engine never talks to an exchange directly; it consumes a data
//! service that normalizes heterogeneous upstream sources into the
//! status/data/metadata envelope below. Concrete clients live in
//! [`crate::providers`].

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Daily resolution, the only one the engine requests.
pub const RESOLUTION_DAILY: &str = "1D";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHistoryRequest {
    pub symbol: String,
    /// Resolution/timeframe (e.g. "1D" for daily).
    pub resolution: String,
    /// Start timestamp (unix seconds).
    pub from: i64,
    /// End timestamp (unix seconds).
    pub to: i64,
    /// Data source to use; the service picks its default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StockHistoryRequest {
    /// 1-day window of daily candles ending at `to`.
    pub fn daily_window(symbol: &str, to: i64, source: Option<&str>) -> Self {
        Self {
            symbol: symbol.to_string(),
            resolution: RESOLUTION_DAILY.to_string(),
            from: to - 86_400,
            to,
            source: source.map(str::to_string),
        }
    }
}

/// Standard OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHistoryResponse {
    pub symbol: String,
    pub resolution: String,
    /// Data source that produced the data.
    pub source: String,
    /// "ok" or "error".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Candle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl StockHistoryResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Provider-supplied multiplier correcting quoted prices to their true
    /// magnitude (e.g. 1000 for sources quoting in thousands of VND).
    pub fn price_scale(&self) -> f64 {
        metadata_price_scale(self.metadata.as_ref())
    }

    /// Close of the most recent candle in the window.
    pub fn last_close(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|candles| candles.last())
            .map(|candle| candle.close)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPriceRequest {
    /// Gold price type/product ID (the entry symbol acts as this).
    pub gold_price_id: String,
    pub from: i64,
    pub to: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GoldPriceRequest {
    pub fn daily_window(gold_price_id: &str, to: i64, source: Option<&str>) -> Self {
        Self {
            gold_price_id: gold_price_id.to_string(),
            from: to - 86_400,
            to,
            source: source.map(str::to_string),
        }
    }
}

/// One buy/sell quote from a gold source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPricePoint {
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub buy: f64,
    pub sell: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPriceResponse {
    pub gold_price_id: String,
    pub source: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<GoldPricePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl GoldPriceResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn price_scale(&self) -> f64 {
        metadata_price_scale(self.metadata.as_ref())
    }

    /// Sell price of the most recent point in the window.
    pub fn last_sell(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|points| points.last())
            .map(|point| point.sell)
    }
}

fn metadata_price_scale(metadata: Option<&serde_json::Value>) -> f64 {
    metadata
        .and_then(|m| m.get("price_scale"))
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0)
}

#[async_trait]
pub trait StockHistorySource: Send + Sync {
    async fn fetch_history(&self, request: &StockHistoryRequest) -> Result<StockHistoryResponse>;
}

#[async_trait]
pub trait GoldPriceSource: Send + Sync {
    async fn fetch_history(&self, request: &GoldPriceRequest) -> Result<GoldPriceResponse>;
}
