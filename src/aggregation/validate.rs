//! Instrument pair validation.

use crate::config::MarketsConfig;
use crate::error::{InstrumentError, Leg};
use crate::models::{Instrument, InstrumentPair};
use serde_json::Value;

/// Reads one instrument from a request value.
///
/// # Errors
/// Returns the [`InstrumentError`] describing the first problem found.
pub fn parse_instrument(
    value: &Value,
    leg: Leg,
    markets: &MarketsConfig,
) -> Result<Instrument, InstrumentError> {
    let Value::Object(fields) = value else {
        return Err(InstrumentError::Malformed(leg));
    };

    let currency = match fields.get("currency") {
        None | Some(Value::Null) => return Err(InstrumentError::MissingCurrency(leg)),
        Some(Value::String(code)) if code.is_empty() => {
            return Err(InstrumentError::MissingCurrency(leg));
        }
        Some(Value::String(code)) => code.as_str(),
        Some(_) => return Err(InstrumentError::Malformed(leg)),
    };

    let issuer = match fields.get("issuer") {
        None | Some(Value::Null) => None,
        Some(Value::String(issuer)) if issuer.is_empty() => None,
        Some(Value::String(issuer)) => Some(issuer.as_str()),
        Some(_) => return Err(InstrumentError::Malformed(leg)),
    };

    match (markets.is_native(currency), issuer) {
        (true, Some(_)) => Err(InstrumentError::NativeWithIssuer(currency.to_string())),
        (true, None) => Ok(Instrument::native(currency)),
        (false, Some(issuer)) => Ok(Instrument::issued(currency, issuer)),
        (false, None) => Err(InstrumentError::MissingIssuer(leg)),
    }
}

/// Resolves the pairs a request covers.
///
/// Both sides given: one validated pair. Neither given: the configured
/// default basket. Only one side given: an error naming the missing side.
///
/// # Errors
/// Returns an [`InstrumentError`] if validation fails.
pub fn resolve_pairs(
    base: Option<&Value>,
    counter: Option<&Value>,
    markets: &MarketsConfig,
) -> Result<Vec<InstrumentPair>, InstrumentError> {
    match (base, counter) {
        (Some(base), Some(counter)) => {
            let base = parse_instrument(base, Leg::Base, markets)?;
            let counter = parse_instrument(counter, Leg::Counter, markets)?;
            Ok(vec![InstrumentPair { base, counter }])
        }
        (Some(_), None) => Err(InstrumentError::CounterRequired),
        (None, Some(_)) => Err(InstrumentError::BaseRequired),
        (None, None) => Ok(markets.basket()),
    }
}
