//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 500,
        message: "counter currency is required".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("counter currency is required"));
}

#[test]
fn test_not_found_error_display() {
    let error = Error::NotFound("Available paths are: marketmakers".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Not found"));
    assert!(display.contains("marketmakers"));
}

#[test]
fn test_invalid_request_error_display() {
    let error = Error::InvalidRequest("route name is empty".to_string());

    assert!(error.to_string().contains("Invalid request"));
}

#[test]
fn test_code_from_envelope() {
    let error = Error::Api {
        status: 500,
        message: r#"{"error":"counter currency is required","code":"MISSING_COUNTERPARTY"}"#
            .to_string(),
    };

    assert_eq!(error.code().as_deref(), Some("MISSING_COUNTERPARTY"));
}

#[test]
fn test_code_absent_for_plain_text() {
    let error = Error::Api {
        status: 502,
        message: "Bad Gateway".to_string(),
    };

    assert!(error.code().is_none());
    assert!(Error::NotFound("x".to_string()).code().is_none());
}
