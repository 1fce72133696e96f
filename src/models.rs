//! Request and response models for the REST API.

use crate::error::ApiError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

/// A tradable unit: the network's native unit or an issued currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Instrument {
    /// Currency code (e.g., "XRP", "USD").
    pub currency: String,
    /// Issuing account. Absent for the native unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl Instrument {
    /// Creates the native unit instrument.
    #[must_use]
    pub fn native(code: &str) -> Self {
        Self {
            currency: code.to_string(),
            issuer: None,
        }
    }

    /// Creates an issued instrument.
    #[must_use]
    pub fn issued(code: &str, issuer: &str) -> Self {
        Self {
            currency: code.to_string(),
            issuer: Some(issuer.to_string()),
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.issuer {
            Some(issuer) => write!(f, "{}.{}", self.currency, issuer),
            None => write!(f, "{}", self.currency),
        }
    }
}

/// A base/counter instrument combination defining one market.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct InstrumentPair {
    /// Base instrument.
    pub base: Instrument,
    /// Counter instrument.
    pub counter: Instrument,
}

impl std::fmt::Display for InstrumentPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}

/// Accumulated trading activity for one account within a request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParticipantRecord {
    /// Participant identity (account address).
    pub account: String,
    /// Summed trade volume.
    #[serde(serialize_with = "serialize_volume")]
    #[schema(value_type = f64)]
    pub volume: Decimal,
    /// Number of trade legs the account appeared in.
    pub count: u64,
}

impl ParticipantRecord {
    /// Starts a record from the first sighting of an account.
    #[must_use]
    pub fn new(account: &str, volume: Decimal) -> Self {
        Self {
            account: account.to_string(),
            volume,
            count: 1,
        }
    }

    /// Credits one more trade leg to the record.
    ///
    /// # Errors
    /// Returns `SubQueryFailure` if the summed volume overflows.
    pub fn credit(&mut self, volume: Decimal) -> Result<(), ApiError> {
        self.volume = self.volume.checked_add(volume).ok_or_else(|| {
            ApiError::SubQueryFailure(format!("volume overflow for account {}", self.account))
        })?;
        self.count += 1;
        Ok(())
    }
}

/// Converts a decimal volume into a JSON number.
///
/// Whole values become integers so `10` renders as `10` rather than `10.0`.
#[must_use]
pub fn volume_to_json(volume: &Decimal) -> Value {
    let normalized = volume.normalize();
    if normalized.scale() == 0
        && let Some(whole) = normalized.to_i64()
    {
        return Value::from(whole);
    }

    normalized
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn serialize_volume<S>(volume: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    volume_to_json(volume).serialize(serializer)
}

/// Parameters accepted by the market makers route.
///
/// Fields are kept loosely typed so validation can report which part of
/// the request is malformed.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketMakersRequest {
    /// Base currency-issuer, e.g. `{"currency": "USD", "issuer": "r..."}`.
    #[serde(default)]
    pub base: Option<Value>,
    /// Counter currency-issuer. Required if base is present.
    #[serde(default)]
    pub counter: Option<Value>,
    /// One of "30d", "7d", "24h". Anything else means 24 hours.
    #[serde(default)]
    pub range: Option<Value>,
    /// Window anchor. The window extends forward from this point.
    #[serde(default)]
    pub start_time: Option<Value>,
    /// "json", "csv" or absent for a header-first array.
    #[serde(default)]
    pub format: Option<Value>,
}

impl MarketMakersRequest {
    /// The parameters this route reads, used as the request's cache identity.
    #[must_use]
    pub fn identity(&self) -> Value {
        json!({
            "base": self.base.as_ref().map(instrument_identity),
            "counter": self.counter.as_ref().map(instrument_identity),
            "range": self.range,
            "startTime": self.start_time,
            "format": self.format,
        })
    }
}

/// Parameters accepted by the offers exercised route.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OffersExercisedRequest {
    /// Base currency-issuer.
    #[serde(default)]
    pub base: Option<Value>,
    /// Counter currency-issuer.
    #[serde(default)]
    pub counter: Option<Value>,
    /// Range token used when no explicit end time is given.
    #[serde(default)]
    pub range: Option<Value>,
    /// Window start.
    #[serde(default)]
    pub start_time: Option<Value>,
    /// Window end. Only honoured together with `startTime`.
    #[serde(default)]
    pub end_time: Option<Value>,
    /// Forwarded to the ledger query.
    #[serde(default)]
    pub reduce: Option<bool>,
    /// Output format.
    #[serde(default)]
    pub format: Option<Value>,
}

impl OffersExercisedRequest {
    /// The parameters this route reads, used as the request's cache identity.
    #[must_use]
    pub fn identity(&self) -> Value {
        json!({
            "base": self.base.as_ref().map(instrument_identity),
            "counter": self.counter.as_ref().map(instrument_identity),
            "range": self.range,
            "startTime": self.start_time,
            "endTime": self.end_time,
            "reduce": self.reduce,
            "format": self.format,
        })
    }
}

/// Keeps only `currency` and `issuer` of an instrument object.
fn instrument_identity(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let kept: Map<String, Value> = fields
                .iter()
                .filter(|(name, _)| matches!(name.as_str(), "currency" | "issuer"))
                .map(|(name, field)| (name.clone(), field.clone()))
                .collect();
            Value::Object(kept)
        }
        other => other.clone(),
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether the response cache is currently serving reads.
    pub cache_enabled: bool,
}

/// JSON envelope returned when `format` is "json".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowedResponse<T: Serialize> {
    /// Window start, `YYYY-MM-DDTHH:MM:SS+00:00`.
    pub start_time: String,
    /// Window end (exclusive).
    pub end_time: String,
    /// Result rows.
    pub results: T,
}
