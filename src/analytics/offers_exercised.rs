//! Exercised offers for one instrument pair.

use crate::aggregation::{AggregationEngine, parse_instrument};
use crate::api::dispatch::RouteHandler;
use crate::config::MarketsConfig;
use crate::error::{ApiError, InstrumentError, Leg};
use crate::format::{HandlerOutput, ResponseFormat, Table, format_table};
use crate::ledger::{ExchangeQuery, LedgerRows};
use crate::models::{InstrumentPair, OffersExercisedRequest};
use crate::window::{self, TimeWindow};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Passes a validated single-pair query through to the ledger and formats
/// its rows.
pub struct OffersExercisedHandler {
    engine: AggregationEngine,
    markets: Arc<MarketsConfig>,
}

impl OffersExercisedHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(engine: AggregationEngine, markets: Arc<MarketsConfig>) -> Self {
        Self { engine, markets }
    }

    fn pair(&self, request: &OffersExercisedRequest) -> Result<InstrumentPair, InstrumentError> {
        match (&request.base, &request.counter) {
            (Some(base), Some(counter)) => Ok(InstrumentPair {
                base: parse_instrument(base, Leg::Base, &self.markets)?,
                counter: parse_instrument(counter, Leg::Counter, &self.markets)?,
            }),
            (Some(_), None) => Err(InstrumentError::CounterRequired),
            (None, _) => Err(InstrumentError::BaseRequired),
        }
    }
}

fn request_window(request: &OffersExercisedRequest) -> Result<TimeWindow, ApiError> {
    match (&request.start_time, &request.end_time) {
        (Some(start), Some(end)) => window::explicit(start, end),
        (start, _) => window::resolve(request.range.as_ref(), start.as_ref()),
    }
}

/// Splits ledger rows into a table. An empty answer yields an empty header.
fn rows_to_table(rows: LedgerRows) -> Table {
    let mut rows = rows.into_iter();
    let mut table = Table::new(rows.next().unwrap_or_default());
    for row in rows {
        table.push(row);
    }
    table
}

/// Keys each data row by the header cell in the same position.
fn rows_as_objects(table: &Table, header: &[Value]) -> Value {
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(index, cell)| match cell {
            Value::String(name) => name.clone(),
            _ => index.to_string(),
        })
        .collect();

    table
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = row
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let name = names.get(index).cloned().unwrap_or_else(|| index.to_string());
                    (name, cell.clone())
                })
                .collect();
            Value::Object(object)
        })
        .collect()
}

#[async_trait]
impl RouteHandler for OffersExercisedHandler {
    async fn handle(&self, params: Value) -> Result<HandlerOutput, ApiError> {
        let request: OffersExercisedRequest = serde_json::from_value(params)
            .map_err(|err| ApiError::InvalidParameter(err.to_string()))?;

        let window = request_window(&request)?;
        let pair = self.pair(&request)?;
        let query = ExchangeQuery::new(
            pair.base.clone(),
            pair.counter.clone(),
            &window,
            request.reduce.unwrap_or(false),
        );

        let rows = self.engine.run(&query, &pair.to_string()).await?;
        let header = rows.first().cloned().unwrap_or_default();
        let table = rows_to_table(rows);

        let format = ResponseFormat::from_param(request.format.as_ref());
        let results = match format {
            ResponseFormat::Json => rows_as_objects(&table, &header),
            _ => Value::Null,
        };

        format_table(table, results, &window, format)
            .map_err(|err| ApiError::Internal(err.to_string()))
    }

    fn cache_params(&self, params: &Value) -> Value {
        serde_json::from_value::<OffersExercisedRequest>(params.clone())
            .map(|request| request.identity())
            .unwrap_or(Value::Null)
    }
}
