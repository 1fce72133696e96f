//! # Ledger Gateway - Analytics Query Server
//!
//! An HTTP gateway in front of a ledger query service. Callers POST a JSON
//! body to `/api/<route>`; the gateway resolves a time window, validates the
//! instrument pair, fans the query out to the ledger and shapes the answer
//! as JSON, CSV text or a header-first table. Built with
//! [Axum](https://crates.io/crates/axum) and documented via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Forgiving Routing**: `/api/marketMakers`, `/api/market_makers` and
//!   `/api/MarketMakers/anything` all reach the same handler.
//!
//! - **Concurrent Fan-out**: Market-wide queries run one ledger sub-query per
//!   default pair and merge participants by account as results arrive.
//!
//! - **Exact Volumes**: Volumes are summed as decimals.
//!
//! - **Fail-open Cache**: Responses can be cached in Redis or in memory. The
//!   first store error turns caching off for the life of the process.
//!
//! - **Structured Logging**: Request tracing with `tracing` and `tower-http`.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Dispatcher, HTTP handlers and router |
//! | [`analytics`] | Route handlers for each analytics operation |
//! | [`aggregation`] | Pair validation and multi-pair aggregation |
//! | [`window`] | Time window resolution |
//! | [`format`] | JSON / CSV / table output |
//! | [`cache`] | Response cache and its stores |
//! | [`ledger`] | Ledger query collaborator |
//! | [`config`] | TOML configuration |
//! | [`error`] | Error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`state`] | Application state |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/marketMakers` | Participants ranked by traded volume |
//! | POST | `/api/offersExercised` | Exercised offers for one pair |
//!
//! ## Example Usage
//!
//! ```bash
//! # Start with the development profile
//! cargo run -- --config config/gateway.toml --env development
//!
//! # Top market makers across the default basket over the last week
//! curl -X POST http://localhost:5993/api/marketMakers \
//!   -H "Content-Type: application/json" \
//!   -d '{"range": "7d", "format": "csv"}'
//!
//! # One pair, anchored at a start time
//! curl -X POST http://localhost:5993/api/marketMakers \
//!   -H "Content-Type: application/json" \
//!   -d '{"base": {"currency": "XRP"},
//!        "counter": {"currency": "USD", "issuer": "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B"},
//!        "startTime": "2014-01-01T00:00:00Z", "format": "json"}'
//! ```

pub mod aggregation;
pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod models;
pub mod state;
pub mod window;

#[cfg(test)]
mod testing;
