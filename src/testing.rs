//! Scripted collaborators shared by unit tests.

use crate::ledger::{ExchangeQuery, LedgerError, LedgerQuery, LedgerRows};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// How the scripted ledger answers one pair.
pub enum Script {
    Rows(LedgerRows),
    Fail(String),
    Hang,
}

/// Ledger that answers from a per-pair script and records every query.
///
/// Pairs are keyed by their `base/counter` display form. Unscripted pairs
/// return a header row only.
#[derive(Default)]
pub struct ScriptedLedger {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<ExchangeQuery>>,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, pair: &str, rows: Vec<Vec<Value>>) -> Self {
        let mut all = vec![header()];
        all.extend(rows);
        self.scripts.insert(pair.to_string(), Script::Rows(all));
        self
    }

    pub fn failing(mut self, pair: &str, message: &str) -> Self {
        self.scripts
            .insert(pair.to_string(), Script::Fail(message.to_string()));
        self
    }

    pub fn hanging(mut self, pair: &str) -> Self {
        self.scripts.insert(pair.to_string(), Script::Hang);
        self
    }

    pub fn calls(&self) -> Vec<ExchangeQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerQuery for ScriptedLedger {
    async fn offers_exercised(&self, query: &ExchangeQuery) -> Result<LedgerRows, LedgerError> {
        self.calls.lock().unwrap().push(query.clone());
        let key = format!("{}/{}", query.base, query.counter);

        match self.scripts.get(&key) {
            Some(Script::Rows(rows)) => Ok(rows.clone()),
            Some(Script::Fail(message)) => Err(LedgerError::Status {
                status: 500,
                message: message.clone(),
            }),
            Some(Script::Hang) => futures::future::pending().await,
            None => Ok(vec![header()]),
        }
    }
}

/// Header row of an exercised-offer response.
pub fn header() -> Vec<Value> {
    vec![
        json!("time"),
        json!("price"),
        json!("baseAmount"),
        json!("counterAmount"),
        json!("account"),
        json!("counterparty"),
        json!("tx_hash"),
    ]
}

/// One exercised-offer row.
pub fn trade(volume: Value, account: &str, counterparty: &str) -> Vec<Value> {
    vec![
        json!("2014-01-01T00:00:00+00:00"),
        json!(0.02),
        volume,
        json!(1),
        json!(account),
        json!(counterparty),
        json!("ABCDEF"),
    ]
}
