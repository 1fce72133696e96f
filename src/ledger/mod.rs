//! Ledger query collaborator.
//!
//! The gateway never computes exchange statistics itself. It asks a ledger
//! query service for the exercised offers of one instrument pair inside a
//! window and receives positional rows back, the first of which is a header.

mod http;

pub use http::HttpLedgerQuery;

use crate::models::Instrument;
use crate::window::{TimeWindow, format_timestamp};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Position of the traded volume in an exercised-offer row.
pub const VOLUME_COLUMN: usize = 2;
/// Position of the acting account in an exercised-offer row.
pub const ACCOUNT_COLUMN: usize = 4;
/// Position of the counterparty account in an exercised-offer row.
pub const COUNTERPARTY_COLUMN: usize = 5;

/// Rows returned by the ledger; `rows[0]` is the header.
pub type LedgerRows = Vec<Vec<Value>>;

/// Ledger query errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transport failure.
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The ledger answered with a non-success status.
    #[error("ledger returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The ledger answered with something other than rows.
    #[error("unexpected ledger response: {0}")]
    Decode(String),

    /// The sub-query did not finish before its deadline.
    #[error("ledger query for {pair} timed out after {timeout_ms}ms")]
    Timeout {
        /// Pair being queried.
        pair: String,
        /// Deadline in milliseconds.
        timeout_ms: u64,
    },
}

/// Parameters of one exercised-offers query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuery {
    /// Base instrument.
    pub base: Instrument,
    /// Counter instrument.
    pub counter: Instrument,
    /// Window start, `YYYY-MM-DDTHH:MM:SS+00:00`.
    pub start_time: String,
    /// Window end, `YYYY-MM-DDTHH:MM:SS+00:00`.
    pub end_time: String,
    /// Whether the ledger should reduce rows to a single aggregate.
    pub reduce: bool,
}

impl ExchangeQuery {
    /// Builds a query for one pair over a window.
    #[must_use]
    pub fn new(base: Instrument, counter: Instrument, window: &TimeWindow, reduce: bool) -> Self {
        Self {
            base,
            counter,
            start_time: format_timestamp(window.start()),
            end_time: format_timestamp(window.end()),
            reduce,
        }
    }
}

/// Source of exercised-offer rows.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Returns the exercised offers for a pair, header row first.
    async fn offers_exercised(&self, query: &ExchangeQuery) -> Result<LedgerRows, LedgerError>;
}
