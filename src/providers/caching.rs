//! Opt-in caching decorators around the quote and currency traits.
//!
//! Errors are never cached, so a transient upstream failure is retried
//! on the next call. Pair a TTL with long-lived embedders; the default
//! unbounded lifetime is meant for one-shot computations.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::cache::Cache;
use crate::core::currency::CurrencyConverter;
use crate::core::price::{
    GoldPriceRequest, GoldPriceResponse, GoldPriceSource, StockHistoryRequest,
    StockHistoryResponse, StockHistorySource,
};

type WindowKey = (String, Option<String>, i64);

pub struct CachingStockSource<T: StockHistorySource> {
    inner: T,
    cache: Cache<WindowKey, StockHistoryResponse>,
}

impl<T: StockHistorySource> CachingStockSource<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Cache::new(),
        }
    }

    pub fn with_ttl(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::with_ttl(ttl),
        }
    }
}

#[async_trait]
impl<T: StockHistorySource + Send + Sync> StockHistorySource for CachingStockSource<T> {
    async fn fetch_history(&self, request: &StockHistoryRequest) -> Result<StockHistoryResponse> {
        let key = (request.symbol.clone(), request.source.clone(), request.to);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(symbol = %request.symbol, "Cached stock history");
            return Ok(cached);
        }
        let response = self.inner.fetch_history(request).await?;
        self.cache.put(key, response.clone()).await;
        Ok(response)
    }
}

pub struct CachingGoldSource<T: GoldPriceSource> {
    inner: T,
    cache: Cache<WindowKey, GoldPriceResponse>,
}

impl<T: GoldPriceSource> CachingGoldSource<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Cache::new(),
        }
    }

    pub fn with_ttl(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::with_ttl(ttl),
        }
    }
}

#[async_trait]
impl<T: GoldPriceSource + Send + Sync> GoldPriceSource for CachingGoldSource<T> {
    async fn fetch_history(&self, request: &GoldPriceRequest) -> Result<GoldPriceResponse> {
        let key = (
            request.gold_price_id.clone(),
            request.source.clone(),
            request.to,
        );
        if let Some(cached) = self.cache.get(&key).await {
            debug!(gold_price_id = %request.gold_price_id, "Cached gold history");
            return Ok(cached);
        }
        let response = self.inner.fetch_history(request).await?;
        self.cache.put(key, response.clone()).await;
        Ok(response)
    }
}

/// Caches the unit rate of each currency pair and scales amounts with
/// it. Assumes the wrapped conversion is linear in the amount, which
/// holds for every rate-based converter.
pub struct CachingCurrencyConverter<T: CurrencyConverter> {
    inner: T,
    cache: Cache<String, f64>,
}

impl<T: CurrencyConverter> CachingCurrencyConverter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Cache::new(),
        }
    }

    pub fn with_ttl(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::with_ttl(ttl),
        }
    }
}

#[async_trait]
impl<T: CurrencyConverter + Send + Sync> CurrencyConverter for CachingCurrencyConverter<T> {
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        let key = format!("{from}-{to}");
        if let Some(rate) = self.cache.get(&key).await {
            debug!(pair = %key, "Cached currency rate");
            return Ok(amount * rate);
        }
        let rate = self.inner.convert(1.0, from, to).await?;
        self.cache.put(key, rate).await;
        Ok(amount * rate)
    }
}
