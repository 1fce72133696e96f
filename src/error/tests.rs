//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "invalid start time".to_string(),
        code: "INVALID_PARAMETER".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"invalid start time\""));
    assert!(json.contains("\"code\":\"INVALID_PARAMETER\""));
}

// ============================================================================
// InstrumentError Display Tests
// ============================================================================

#[test]
fn test_instrument_error_messages() {
    assert_eq!(
        InstrumentError::Malformed(Leg::Base).to_string(),
        "invalid base currency"
    );
    assert_eq!(
        InstrumentError::Malformed(Leg::Counter).to_string(),
        "invalid counter currency"
    );
    assert_eq!(
        InstrumentError::MissingCurrency(Leg::Base).to_string(),
        "base currency is required"
    );
    assert_eq!(
        InstrumentError::MissingIssuer(Leg::Counter).to_string(),
        "counter issuer is required"
    );
    assert_eq!(
        InstrumentError::NativeWithIssuer("XRP".to_string()).to_string(),
        "XRP cannot have an issuer"
    );
    assert_eq!(
        InstrumentError::CounterRequired.to_string(),
        "counter currency is required"
    );
    assert_eq!(
        InstrumentError::BaseRequired.to_string(),
        "base currency is required"
    );
}

#[test]
fn test_counter_required_code() {
    assert_eq!(
        InstrumentError::CounterRequired.code(),
        "MISSING_COUNTERPARTY"
    );
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_route_not_found_display() {
    let error = ApiError::RouteNotFound {
        route: "nope".to_string(),
        available: vec!["marketmakers".to_string(), "offersexercised".to_string()],
    };
    assert_eq!(
        format!("{}", error),
        "Sorry, that API route doesn't seem to exist. Available paths are: marketmakers, offersexercised"
    );
}

#[test]
fn test_api_error_invalid_parameter_display() {
    let error = ApiError::InvalidParameter("invalid start time".to_string());
    assert_eq!(format!("{}", error), "invalid start time");
}

#[test]
fn test_api_error_instrument_is_transparent() {
    let error = ApiError::from(InstrumentError::BaseRequired);
    assert_eq!(format!("{}", error), "base currency is required");
}

#[test]
fn test_api_error_sub_query_display() {
    let error = ApiError::SubQueryFailure("ledger unavailable".to_string());
    assert_eq!(format!("{}", error), "ledger unavailable");
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_route_not_found_into_response() {
    let error = ApiError::RouteNotFound {
        route: "nope".to_string(),
        available: vec!["marketmakers".to_string()],
    };
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_invalid_parameter_into_response() {
    let error = ApiError::InvalidParameter("bad".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_api_error_instrument_into_response() {
    let error = ApiError::Instrument(InstrumentError::CounterRequired);
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_api_error_sub_query_into_response() {
    let error = ApiError::SubQueryFailure("boom".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_api_error_invalid_body_into_response() {
    let error = ApiError::InvalidBody("expected object".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_api_error_internal_into_response() {
    let error = ApiError::Internal("Server error".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_ledger_error_becomes_sub_query_failure() {
    let error = ApiError::from(LedgerError::Status {
        status: 503,
        message: "down".to_string(),
    });
    assert!(matches!(error, ApiError::SubQueryFailure(_)));
    assert!(error.to_string().contains("503"));
}

// ============================================================================
// ApiError Debug Tests
// ============================================================================

#[test]
fn test_api_error_debug() {
    let error = ApiError::InvalidParameter("invalid start time".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("InvalidParameter"));
    assert!(debug.contains("invalid start time"));
}
