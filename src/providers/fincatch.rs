use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::price::{
    GoldPriceRequest, GoldPriceResponse, GoldPriceSource, StockHistoryRequest,
    StockHistoryResponse, StockHistorySource,
};

const USER_AGENT: &str = "vnfolio/0.3";

/// Client for the fin-catch data service, which normalizes upstream
/// exchanges and gold desks into the common history envelope.
///
/// Implements both quote source traits; "status": "error" responses are
/// passed through so the resolver can soft-skip them.
pub struct FinCatchClient {
    base_url: String,
}

impl FinCatchClient {
    pub fn new(base_url: &str) -> Self {
        FinCatchClient {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, request: &Req, context: &str) -> Result<Resp>
    where
        Req: serde::Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting history from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {} URL: {}", e, context, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), context));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| anyhow!("Failed to parse response for {}: {}", context, e))
    }
}

#[async_trait]
impl StockHistorySource for FinCatchClient {
    #[instrument(
        name = "StockHistoryFetch",
        skip(self, request),
        fields(symbol = %request.symbol)
    )]
    async fn fetch_history(&self, request: &StockHistoryRequest) -> Result<StockHistoryResponse> {
        self.post_json(
            "/api/v1/stock/history",
            request,
            &format!("symbol: {}", request.symbol),
        )
        .await
    }
}

#[async_trait]
impl GoldPriceSource for FinCatchClient {
    #[instrument(
        name = "GoldPriceFetch",
        skip(self, request),
        fields(gold_price_id = %request.gold_price_id)
    )]
    async fn fetch_history(&self, request: &GoldPriceRequest) -> Result<GoldPriceResponse> {
        self.post_json(
            "/api/v1/gold/history",
            request,
            &format!("gold price id: {}", request.gold_price_id),
        )
        .await
    }
}
