//! Integration tests for the Ledger Gateway API.
//!
//! Every test starts its own fake ledger service and gateway in-process, each
//! on an ephemeral port, and talks to the gateway through `gateway-client`.
//! Nothing external needs to be running.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use gateway_client::{ClientConfig, GatewayClient};
use ledger_gateway::api::create_router;
use ledger_gateway::config::{Config, RuntimeSettings};
use ledger_gateway::state::AppState;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Gateway issuer used by the first default pairs.
pub const GATEWAY_ISSUER: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";

/// Number of pairs in the built-in default basket.
pub const DEFAULT_BASKET_SIZE: usize = 9;

/// Pair key of the default USD market.
#[must_use]
pub fn default_usd_pair() -> String {
    format!("XRP/USD.{}", GATEWAY_ISSUER)
}

/// Pair key of the default BTC market.
#[must_use]
pub fn default_btc_pair() -> String {
    format!("XRP/BTC.{}", GATEWAY_ISSUER)
}

/// Header row the fake ledger puts first.
#[must_use]
pub fn ledger_header() -> Vec<Value> {
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
#[must_use]
pub fn trade(volume: f64, account: &str, counterparty: &str) -> Vec<Value> {
    vec![
        json!("2014-01-01T00:00:00+00:00"),
        json!(0.02),
        json!(volume),
        json!(1),
        json!(account),
        json!(counterparty),
        json!("ABCDEF"),
    ]
}

/// What the fake ledger answers, keyed by `base/counter`
/// (`CODE` or `CODE.issuer` on each side).
#[derive(Debug, Default, Clone)]
pub struct LedgerScript {
    rows: HashMap<String, Vec<Vec<Value>>>,
    failing: HashSet<String>,
}

impl LedgerScript {
    /// Empty script: every pair answers with the header only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `pair` with the given data rows.
    #[must_use]
    pub fn with_rows(mut self, pair: &str, rows: Vec<Vec<Value>>) -> Self {
        self.rows.insert(pair.to_string(), rows);
        self
    }

    /// Answers `pair` with a 503.
    #[must_use]
    pub fn failing(mut self, pair: &str) -> Self {
        self.failing.insert(pair.to_string());
        self
    }
}

#[derive(Clone)]
struct LedgerState {
    script: Arc<LedgerScript>,
    calls: Arc<Mutex<Vec<Value>>>,
}

/// Fake ledger query service.
pub struct FakeLedger {
    /// Endpoint the gateway posts queries to.
    pub endpoint: String,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl FakeLedger {
    /// Query bodies received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of queries received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

fn instrument_key(instrument: &Value) -> String {
    let currency = instrument["currency"].as_str().unwrap_or_default();
    match instrument["issuer"].as_str() {
        Some(issuer) => format!("{}.{}", currency, issuer),
        None => currency.to_string(),
    }
}

async fn answer_query(State(state): State<LedgerState>, Json(query): Json<Value>) -> Response {
    let pair = format!(
        "{}/{}",
        instrument_key(&query["base"]),
        instrument_key(&query["counter"])
    );
    if let Ok(mut calls) = state.calls.lock() {
        calls.push(query);
    }

    if state.script.failing.contains(&pair) {
        return (StatusCode::SERVICE_UNAVAILABLE, "ledger unavailable").into_response();
    }

    let mut rows = vec![ledger_header()];
    rows.extend(state.script.rows.get(&pair).cloned().unwrap_or_default());
    Json(rows).into_response()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("server error");
    });
    addr
}

/// Starts a fake ledger service.
pub async fn spawn_ledger(script: LedgerScript) -> FakeLedger {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = LedgerState {
        script: Arc::new(script),
        calls: Arc::clone(&calls),
    };
    let router = Router::new()
        .route("/ledger/offers_exercised", post(answer_query))
        .with_state(state);

    let addr = serve(router).await;
    FakeLedger {
        endpoint: format!("http://{}/ledger/offers_exercised", addr),
        calls,
    }
}

/// A running gateway.
pub struct TestGateway {
    /// Base URL, e.g. `http://127.0.0.1:40123`.
    pub base_url: String,
    /// Client pointed at the gateway.
    pub client: GatewayClient,
}

/// Starts a gateway in front of `ledger`, optionally with an in-memory cache.
pub async fn spawn_gateway(ledger: &FakeLedger, cache: bool) -> TestGateway {
    let config = Config::parse(&format!(
        r#"
[profiles.test.ledger]
endpoint = "{}"
timeout_ms = 5000

[profiles.test.cache]
enabled = {}
backend = "memory"
"#,
        ledger.endpoint, cache
    ))
    .expect("valid test config");
    let profile = config.profile("test").expect("test profile");

    let settings = RuntimeSettings {
        debug: true,
        cache_allowed: true,
    };
    let state = AppState::from_config(profile, config.markets.clone(), settings)
        .await
        .expect("gateway state");

    let addr = serve(create_router(Arc::new(state))).await;
    let base_url = format!("http://{}", addr);
    let client = GatewayClient::new(ClientConfig {
        base_url: base_url.clone(),
        timeout: Duration::from_secs(10),
    })
    .expect("gateway client");

    TestGateway { base_url, client }
}

/// Starts a fake ledger and a gateway in front of it.
pub async fn spawn_stack(script: LedgerScript, cache: bool) -> (TestGateway, FakeLedger) {
    let ledger = spawn_ledger(script).await;
    let gateway = spawn_gateway(&ledger, cache).await;
    (gateway, ledger)
}
