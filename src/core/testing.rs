//! Mock collaborators shared by the unit tests.

use crate::core::coupons::{CouponPayment, CouponSource};
use crate::core::currency::CurrencyConverter;
use crate::core::price::{
    Candle, GoldPricePoint, GoldPriceRequest, GoldPriceResponse, StockHistoryRequest,
    StockHistoryResponse, StockHistorySource,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub(crate) struct MockStockSource {
    closes: HashMap<String, f64>,
    closes_at: HashMap<(String, i64), f64>,
    timed_symbols: HashSet<String>,
    scales: HashMap<String, f64>,
    errors: HashMap<String, String>,
}

impl MockStockSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Close returned for any window ending at any timestamp.
    pub(crate) fn add_close(&mut self, symbol: &str, close: f64) {
        self.closes.insert(symbol.to_string(), close);
    }

    /// Close returned only for a window ending exactly at `to`; windows at
    /// other timestamps yield an empty candle list.
    pub(crate) fn add_close_at(&mut self, symbol: &str, to: i64, close: f64) {
        self.closes_at.insert((symbol.to_string(), to), close);
        self.timed_symbols.insert(symbol.to_string());
    }

    pub(crate) fn set_price_scale(&mut self, symbol: &str, scale: f64) {
        self.scales.insert(symbol.to_string(), scale);
    }

    pub(crate) fn add_error(&mut self, symbol: &str, message: &str) {
        self.errors.insert(symbol.to_string(), message.to_string());
    }

    fn response(&self, symbol: &str, data: Option<Vec<Candle>>) -> StockHistoryResponse {
        StockHistoryResponse {
            symbol: symbol.to_string(),
            resolution: "1D".to_string(),
            source: "vndirect".to_string(),
            status: "ok".to_string(),
            data,
            error: None,
            metadata: Some(serde_json::json!({
                "price_scale": self.scales.get(symbol).copied().unwrap_or(1.0)
            })),
        }
    }
}

#[async_trait]
impl StockHistorySource for MockStockSource {
    async fn fetch_history(&self, request: &StockHistoryRequest) -> Result<StockHistoryResponse> {
        if let Some(message) = self.errors.get(&request.symbol) {
            return Err(anyhow!(message.clone()));
        }
        let key = (request.symbol.clone(), request.to);
        if let Some(close) = self.closes_at.get(&key) {
            return Ok(self.response(&request.symbol, Some(vec![candle(request.to, *close)])));
        }
        if let Some(close) = self.closes.get(&request.symbol) {
            return Ok(self.response(&request.symbol, Some(vec![candle(request.to, *close)])));
        }
        if self.timed_symbols.contains(&request.symbol) {
            return Ok(self.response(&request.symbol, Some(Vec::new())));
        }
        Err(anyhow!("No mock data for {}", request.symbol))
    }
}

fn candle(timestamp: i64, close: f64) -> Candle {
    Candle {
        timestamp,
        open: close,
        high: close,
        low: close,
        close,
        volume: 0,
    }
}

#[derive(Default)]
pub(crate) struct MockGoldSource {
    sells: HashMap<String, f64>,
    sells_at: HashMap<(String, i64), f64>,
    timed_ids: HashSet<String>,
}

impl MockGoldSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_sell(&mut self, gold_price_id: &str, sell: f64) {
        self.sells.insert(gold_price_id.to_string(), sell);
    }

    pub(crate) fn add_sell_at(&mut self, gold_price_id: &str, to: i64, sell: f64) {
        self.sells_at.insert((gold_price_id.to_string(), to), sell);
        self.timed_ids.insert(gold_price_id.to_string());
    }

    fn response(&self, gold_price_id: &str, data: Option<Vec<GoldPricePoint>>) -> GoldPriceResponse {
        GoldPriceResponse {
            gold_price_id: gold_price_id.to_string(),
            source: "sjc".to_string(),
            status: "ok".to_string(),
            data,
            error: None,
            metadata: Some(serde_json::json!({ "price_scale": 1.0, "currency": "VND" })),
        }
    }
}

#[async_trait]
impl crate::core::price::GoldPriceSource for MockGoldSource {
    async fn fetch_history(&self, request: &GoldPriceRequest) -> Result<GoldPriceResponse> {
        let key = (request.gold_price_id.clone(), request.to);
        if let Some(sell) = self.sells_at.get(&key) {
            return Ok(self.response(&request.gold_price_id, Some(vec![point(request.to, *sell)])));
        }
        if let Some(sell) = self.sells.get(&request.gold_price_id) {
            return Ok(self.response(&request.gold_price_id, Some(vec![point(request.to, *sell)])));
        }
        if self.timed_ids.contains(&request.gold_price_id) {
            return Ok(self.response(&request.gold_price_id, Some(Vec::new())));
        }
        Err(anyhow!("No mock data for {}", request.gold_price_id))
    }
}

fn point(timestamp: i64, sell: f64) -> GoldPricePoint {
    GoldPricePoint {
        timestamp,
        type_name: None,
        buy: sell,
        sell,
    }
}

#[derive(Default)]
pub(crate) struct MockCurrencyConverter {
    rates: HashMap<String, f64>,
    errors: HashMap<String, String>,
}

impl MockCurrencyConverter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_rate(&mut self, from: &str, to: &str, rate: f64) {
        self.rates.insert(format!("{from}:{to}"), rate);
    }

    pub(crate) fn add_error(&mut self, from: &str, to: &str, message: &str) {
        self.errors
            .insert(format!("{from}:{to}"), message.to_string());
    }
}

#[async_trait]
impl CurrencyConverter for MockCurrencyConverter {
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        let key = format!("{from}:{to}");
        if let Some(message) = self.errors.get(&key) {
            return Err(anyhow!(message.clone()));
        }
        self.rates
            .get(&key)
            .map(|rate| amount * rate)
            .ok_or_else(|| anyhow!("Rate not found for {} to {}", from, to))
    }
}

#[derive(Default)]
pub(crate) struct MockCouponSource {
    payments: HashMap<String, Vec<CouponPayment>>,
}

impl MockCouponSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_payment(&mut self, entry_id: &str, amount: f64, currency: &str) {
        self.payments
            .entry(entry_id.to_string())
            .or_default()
            .push(CouponPayment {
                entry_id: entry_id.to_string(),
                amount,
                currency: currency.to_string(),
                payment_date: 0,
            });
    }
}

#[async_trait]
impl CouponSource for MockCouponSource {
    async fn list_payments(&self, entry_id: &str) -> Result<Vec<CouponPayment>> {
        Ok(self.payments.get(entry_id).cloned().unwrap_or_default())
    }
}
