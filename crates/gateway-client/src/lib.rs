//! HTTP client library for the Ledger Gateway API.
//!
//! This crate provides a typed HTTP client for the gateway's analytics
//! routes. Each route can be read as a JSON envelope, as CSV text or as the
//! raw header-first table.
//!
//! # Example
//!
//! ```no_run
//! use gateway_client::{ClientConfig, GatewayClient, MarketMakersQuery, Range};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gateway_client::Error> {
//!     let client = GatewayClient::new(ClientConfig {
//!         base_url: "http://localhost:5993".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let top = client
//!         .market_makers(&MarketMakersQuery::default().range(Range::SevenDays))
//!         .await?;
//!     for row in top.results.iter().take(10) {
//!         println!("{} {} {}", row.account, row.volume, row.count);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, GatewayClient};
pub use error::Error;
pub use types::*;
