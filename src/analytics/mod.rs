//! Analytics routes served under `/api/`.

mod market_makers;
mod offers_exercised;

pub use market_makers::MarketMakersHandler;
pub use offers_exercised::OffersExercisedHandler;

use crate::aggregation::AggregationEngine;
use crate::api::dispatch::RouteTable;
use crate::config::MarketsConfig;
use std::sync::Arc;

/// Routes the gateway answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    /// Ranked participants across one pair or the default basket.
    MarketMakers,
    /// Exercised offers for a single pair.
    OffersExercised,
}

impl ApiRoute {
    /// Every route, in registration order.
    pub const ALL: [ApiRoute; 2] = [ApiRoute::MarketMakers, ApiRoute::OffersExercised];

    /// Normalized route key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ApiRoute::MarketMakers => "marketmakers",
            ApiRoute::OffersExercised => "offersexercised",
        }
    }
}

/// Builds the table of every analytics route.
#[must_use]
pub fn route_table(engine: AggregationEngine, markets: Arc<MarketsConfig>) -> RouteTable {
    ApiRoute::ALL
        .iter()
        .fold(RouteTable::builder(), |builder, route| match route {
            ApiRoute::MarketMakers => builder.register(
                route.key(),
                Arc::new(MarketMakersHandler::new(engine.clone(), Arc::clone(&markets))),
            ),
            ApiRoute::OffersExercised => builder.register(
                route.key(),
                Arc::new(OffersExercisedHandler::new(engine.clone(), Arc::clone(&markets))),
            ),
        })
        .build()
}
