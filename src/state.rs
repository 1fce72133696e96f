//! Application state management.

use crate::aggregation::AggregationEngine;
use crate::analytics::route_table;
use crate::api::dispatch::Dispatcher;
use crate::cache::CacheWrapper;
use crate::config::{MarketsConfig, Profile, RuntimeSettings};
use crate::ledger::{HttpLedgerQuery, LedgerError, LedgerQuery};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Route dispatcher, fixed at startup.
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Creates state around an assembled dispatcher.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Assembles the routes over a given ledger collaborator.
    #[must_use]
    pub fn with_ledger(
        ledger: Arc<dyn LedgerQuery>,
        profile: &Profile,
        markets: MarketsConfig,
        cache: Option<CacheWrapper>,
        settings: RuntimeSettings,
    ) -> Self {
        let engine = AggregationEngine::new(
            ledger,
            Duration::from_millis(profile.ledger.timeout_ms),
        );
        let table = route_table(engine, Arc::new(markets));
        info!("Registered routes: {}", table.keys().join(", "));

        Self::new(Dispatcher::new(table, cache, settings))
    }

    /// Creates a new application state from configuration.
    ///
    /// Connects the cache when enabled. A cache that cannot be reached is
    /// logged and left off.
    ///
    /// # Errors
    /// Returns an error if the ledger client cannot be built.
    pub async fn from_config(
        profile: &Profile,
        markets: MarketsConfig,
        settings: RuntimeSettings,
    ) -> Result<Self, LedgerError> {
        let ledger = HttpLedgerQuery::new(&profile.ledger)?;
        info!("Ledger endpoint: {}", ledger.endpoint());

        let cache = CacheWrapper::from_config(&profile.cache, settings).await;

        Ok(Self::with_ledger(
            Arc::new(ledger),
            profile,
            markets,
            cache,
            settings,
        ))
    }
}
