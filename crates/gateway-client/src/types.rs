//! Request and response types for the gateway API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
mod tests;

/// A currency, optionally with its issuing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Currency code.
    pub currency: String,
    /// Issuing account. Omitted for the native unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl Instrument {
    /// The native unit.
    #[must_use]
    pub fn native(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            issuer: None,
        }
    }

    /// An issued currency.
    #[must_use]
    pub fn issued(currency: &str, issuer: &str) -> Self {
        Self {
            currency: currency.to_string(),
            issuer: Some(issuer.to_string()),
        }
    }
}

/// Window length understood by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Range {
    /// 30 days.
    #[serde(rename = "30d")]
    ThirtyDays,
    /// 7 days.
    #[serde(rename = "7d")]
    SevenDays,
    /// 24 hours.
    #[serde(rename = "24h")]
    TwentyFourHours,
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThirtyDays => write!(f, "30d"),
            Self::SevenDays => write!(f, "7d"),
            Self::TwentyFourHours => write!(f, "24h"),
        }
    }
}

/// Output shape requested from a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `{ startTime, endTime, results }` envelope.
    Json,
    /// Comma-joined text.
    Csv,
}

/// Market makers request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMakersQuery {
    /// Base instrument. Omit both sides for the default basket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Instrument>,
    /// Counter instrument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<Instrument>,
    /// Window length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Window start. The window ends now when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Output shape. Set by the client method used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl MarketMakersQuery {
    /// Restricts the query to one pair.
    #[must_use]
    pub fn pair(mut self, base: Instrument, counter: Instrument) -> Self {
        self.base = Some(base);
        self.counter = Some(counter);
        self
    }

    /// Sets the window length.
    #[must_use]
    pub fn range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Anchors the window at a start time.
    #[must_use]
    pub fn start_time(mut self, start_time: &str) -> Self {
        self.start_time = Some(start_time.to_string());
        self
    }
}

/// Exercised offers request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersExercisedQuery {
    /// Base instrument.
    pub base: Instrument,
    /// Counter instrument.
    pub counter: Instrument,
    /// Window length, used when no end time is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Window start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Window end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Ask the ledger to reduce rows to an aggregate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce: Option<bool>,
    /// Output shape. Set by the client method used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl OffersExercisedQuery {
    /// Query for one pair over the default window.
    #[must_use]
    pub fn new(base: Instrument, counter: Instrument) -> Self {
        Self {
            base,
            counter,
            range: None,
            start_time: None,
            end_time: None,
            reduce: None,
            format: None,
        }
    }

    /// Sets an explicit window.
    #[must_use]
    pub fn between(mut self, start_time: &str, end_time: &str) -> Self {
        self.start_time = Some(start_time.to_string());
        self.end_time = Some(end_time.to_string());
        self
    }
}

/// One ranked participant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticipantRow {
    /// Account address.
    pub account: String,
    /// Summed volume.
    pub volume: f64,
    /// Trade legs.
    pub count: u64,
}

/// Windowed JSON envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Windowed<T> {
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
    /// Rows.
    pub results: Vec<T>,
}

/// Market makers JSON response.
pub type MarketMakersResponse = Windowed<ParticipantRow>;

/// Exercised offers JSON response, rows keyed by column name.
pub type OffersExercisedResponse = Windowed<Map<String, Value>>;

/// Header-first table.
pub type TableResponse = Vec<Vec<Value>>;

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether responses are being cached.
    pub cache_enabled: bool,
}

/// Error envelope returned on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}
