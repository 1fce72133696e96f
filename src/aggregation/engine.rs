//! Fan-out, merge and ranking of per-pair ledger results.

use crate::error::ApiError;
use crate::ledger::{
    ACCOUNT_COLUMN, COUNTERPARTY_COLUMN, ExchangeQuery, LedgerError, LedgerQuery, LedgerRows,
    VOLUME_COLUMN,
};
use crate::models::{InstrumentPair, ParticipantRecord};
use crate::window::TimeWindow;
use futures::TryStreamExt;
use futures::stream::FuturesUnordered;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs one ledger sub-query per pair and merges the results by account.
#[derive(Clone)]
pub struct AggregationEngine {
    ledger: Arc<dyn LedgerQuery>,
    sub_query_timeout: Duration,
}

impl AggregationEngine {
    /// Creates an engine over a ledger collaborator.
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerQuery>, sub_query_timeout: Duration) -> Self {
        Self {
            ledger,
            sub_query_timeout,
        }
    }

    /// Ledger collaborator used for sub-queries.
    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn LedgerQuery> {
        &self.ledger
    }

    /// Aggregates participants across `pairs` inside `window`.
    ///
    /// Sub-queries run concurrently. The first failure is returned and the
    /// sub-queries still in flight are dropped. Results are ranked by volume,
    /// descending, with ties ordered by account.
    ///
    /// # Errors
    /// Returns `SubQueryFailure` if any sub-query fails, times out or returns
    /// a malformed row.
    pub async fn aggregate(
        &self,
        pairs: &[InstrumentPair],
        window: &TimeWindow,
    ) -> Result<Vec<ParticipantRecord>, ApiError> {
        let mut pending: FuturesUnordered<_> = pairs
            .iter()
            .map(|pair| self.query_pair(pair, window))
            .collect();

        let mut book = ParticipantBook::default();
        while let Some(rows) = pending.try_next().await? {
            book.merge(&rows)?;
        }

        debug!(
            "Aggregated {} participants across {} pairs",
            book.len(),
            pairs.len()
        );
        Ok(book.ranked())
    }

    /// Runs the exercised-offers query for one pair under the sub-query deadline.
    ///
    /// # Errors
    /// Returns `SubQueryFailure` if the ledger fails or the deadline passes.
    pub async fn query_pair(
        &self,
        pair: &InstrumentPair,
        window: &TimeWindow,
    ) -> Result<LedgerRows, ApiError> {
        let query = ExchangeQuery::new(pair.base.clone(), pair.counter.clone(), window, false);
        self.run(&query, &pair.to_string()).await
    }

    /// Runs an arbitrary query under the sub-query deadline.
    ///
    /// # Errors
    /// Returns `SubQueryFailure` if the ledger fails or the deadline passes.
    pub async fn run(&self, query: &ExchangeQuery, label: &str) -> Result<LedgerRows, ApiError> {
        let outcome = tokio::time::timeout(
            self.sub_query_timeout,
            self.ledger.offers_exercised(query),
        )
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout {
                pair: label.to_string(),
                timeout_ms: u64::try_from(self.sub_query_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        result.map_err(|err| {
            warn!("Sub-query for {} failed: {}", label, err);
            ApiError::from(err)
        })
    }
}

/// Participants seen so far in one request, keyed by account.
#[derive(Debug, Default)]
pub struct ParticipantBook {
    accounts: HashMap<String, ParticipantRecord>,
}

impl ParticipantBook {
    /// Number of distinct accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account has been credited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Credits both parties of every row after the header.
    ///
    /// # Errors
    /// Returns `SubQueryFailure` if a row lacks a volume or either account,
    /// or if an account's summed volume overflows.
    pub fn merge(&mut self, rows: &LedgerRows) -> Result<(), ApiError> {
        for (index, row) in rows.iter().enumerate().skip(1) {
            let volume = row
                .get(VOLUME_COLUMN)
                .and_then(parse_volume)
                .ok_or_else(|| malformed_row(index, "volume"))?;
            let account = row
                .get(ACCOUNT_COLUMN)
                .and_then(Value::as_str)
                .ok_or_else(|| malformed_row(index, "account"))?;
            let counterparty = row
                .get(COUNTERPARTY_COLUMN)
                .and_then(Value::as_str)
                .ok_or_else(|| malformed_row(index, "counterparty"))?;

            self.credit(account, volume)?;
            self.credit(counterparty, volume)?;
        }
        Ok(())
    }

    fn credit(&mut self, account: &str, volume: Decimal) -> Result<(), ApiError> {
        match self.accounts.get_mut(account) {
            Some(record) => record.credit(volume),
            None => {
                self.accounts
                    .insert(account.to_string(), ParticipantRecord::new(account, volume));
                Ok(())
            }
        }
    }

    /// Consumes the book, returning records by volume descending.
    ///
    /// Equal volumes are ordered by account ascending.
    #[must_use]
    pub fn ranked(self) -> Vec<ParticipantRecord> {
        let mut records: Vec<_> = self.accounts.into_values().collect();
        records.sort_by(|a, b| {
            b.volume
                .cmp(&a.volume)
                .then_with(|| a.account.cmp(&b.account))
        });
        records
    }
}

fn malformed_row(index: usize, column: &str) -> ApiError {
    ApiError::SubQueryFailure(format!(
        "malformed ledger row {}: missing or invalid {}",
        index, column
    ))
}

/// Reads a volume cell exactly. Accepts JSON numbers and numeric strings.
fn parse_volume(cell: &Value) -> Option<Decimal> {
    let text = match cell {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
