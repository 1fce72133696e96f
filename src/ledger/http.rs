//! HTTP-backed ledger query client.

use super::{ExchangeQuery, LedgerError, LedgerQuery, LedgerRows};
use crate::config::LedgerConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Ledger query service reached over HTTP.
///
/// Each query is POSTed as JSON to the configured endpoint, which must answer
/// with an array of positional rows.
#[derive(Debug, Clone)]
pub struct HttpLedgerQuery {
    client: Client,
    endpoint: String,
}

impl HttpLedgerQuery {
    /// Creates a client for the configured ledger endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Endpoint queries are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LedgerQuery for HttpLedgerQuery {
    async fn offers_exercised(&self, query: &ExchangeQuery) -> Result<LedgerRows, LedgerError> {
        debug!(
            "Querying ledger for {}/{} from {} to {}",
            query.base, query.counter, query.start_time, query.end_time
        );

        let resp = self.client.post(&self.endpoint).json(query).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = resp.json().await?;
        decode_rows(body)
    }
}

/// Checks that a ledger response is an array of arrays.
pub(crate) fn decode_rows(body: Value) -> Result<LedgerRows, LedgerError> {
    let Value::Array(rows) = body else {
        return Err(LedgerError::Decode("expected an array of rows".to_string()));
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Array(cells) => Ok(cells),
            _ => Err(LedgerError::Decode(format!("row {} is not an array", index))),
        })
        .collect()
}
