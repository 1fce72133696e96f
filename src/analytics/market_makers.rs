//! Ranked trading participants.

use crate::aggregation::{AggregationEngine, resolve_pairs};
use crate::api::dispatch::RouteHandler;
use crate::config::MarketsConfig;
use crate::error::ApiError;
use crate::format::{HandlerOutput, ResponseFormat, format_participants};
use crate::models::MarketMakersRequest;
use crate::window;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Ranks accounts by the volume they traded across one pair or the
/// default basket.
pub struct MarketMakersHandler {
    engine: AggregationEngine,
    markets: Arc<MarketsConfig>,
}

impl MarketMakersHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(engine: AggregationEngine, markets: Arc<MarketsConfig>) -> Self {
        Self { engine, markets }
    }
}

#[async_trait]
impl RouteHandler for MarketMakersHandler {
    async fn handle(&self, params: Value) -> Result<HandlerOutput, ApiError> {
        let request: MarketMakersRequest = serde_json::from_value(params)
            .map_err(|err| ApiError::InvalidParameter(err.to_string()))?;

        let window = window::resolve(request.range.as_ref(), request.start_time.as_ref())?;
        let pairs = resolve_pairs(request.base.as_ref(), request.counter.as_ref(), &self.markets)?;
        debug!("marketMakers: {} pairs from {}", pairs.len(), window.start());

        let records = self.engine.aggregate(&pairs, &window).await?;

        format_participants(
            &records,
            &window,
            ResponseFormat::from_param(request.format.as_ref()),
        )
        .map_err(|err| ApiError::Internal(err.to_string()))
    }

    fn cache_params(&self, params: &Value) -> Value {
        serde_json::from_value::<MarketMakersRequest>(params.clone())
            .map(|request| request.identity())
            .unwrap_or(Value::Null)
    }
}
