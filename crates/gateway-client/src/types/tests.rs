//! Unit tests for types module.

use super::*;
use serde_json::json;

// ============================================================================
// Instrument Tests
// ============================================================================

#[test]
fn test_native_instrument_omits_issuer() {
    let value = serde_json::to_value(Instrument::native("XRP")).unwrap();
    assert_eq!(value, json!({"currency": "XRP"}));
}

#[test]
fn test_issued_instrument() {
    let value = serde_json::to_value(Instrument::issued("USD", "rGate")).unwrap();
    assert_eq!(value, json!({"currency": "USD", "issuer": "rGate"}));
}

// ============================================================================
// Query Tests
// ============================================================================

#[test]
fn test_empty_market_makers_query() {
    let value = serde_json::to_value(MarketMakersQuery::default()).unwrap();
    assert_eq!(value, json!({}));
}

#[test]
fn test_market_makers_query_camel_case() {
    let query = MarketMakersQuery::default()
        .pair(Instrument::native("XRP"), Instrument::issued("USD", "rGate"))
        .range(Range::SevenDays)
        .start_time("2014-01-01");

    let value = serde_json::to_value(query).unwrap();
    assert_eq!(value["range"], "7d");
    assert_eq!(value["startTime"], "2014-01-01");
    assert_eq!(value["counter"]["issuer"], "rGate");
}

#[test]
fn test_offers_exercised_query_between() {
    let query = OffersExercisedQuery::new(Instrument::native("XRP"), Instrument::issued("USD", "r"))
        .between("2014-01-01", "2014-01-02");

    let value = serde_json::to_value(query).unwrap();
    assert_eq!(value["startTime"], "2014-01-01");
    assert_eq!(value["endTime"], "2014-01-02");
    assert!(value.get("reduce").is_none());
}

#[test]
fn test_range_display() {
    assert_eq!(Range::ThirtyDays.to_string(), "30d");
    assert_eq!(Range::TwentyFourHours.to_string(), "24h");
}

// ============================================================================
// Response Tests
// ============================================================================

#[test]
fn test_market_makers_response_deserialize() {
    let response: MarketMakersResponse = serde_json::from_value(json!({
        "startTime": "2014-01-01T00:00:00+00:00",
        "endTime": "2014-01-02T00:00:00+00:00",
        "results": [{"account": "A", "volume": 10, "count": 1}]
    }))
    .unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].volume, 10.0);
}

#[test]
fn test_health_response_deserialize() {
    let health: HealthResponse =
        serde_json::from_str(r#"{"status":"ok","version":"0.2.0","cache_enabled":true}"#).unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.cache_enabled);
}
