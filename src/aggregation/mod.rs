//! Multi-pair aggregation of ledger activity.

mod engine;
mod validate;

pub use engine::{AggregationEngine, ParticipantBook};
pub use validate::{parse_instrument, resolve_pairs};
