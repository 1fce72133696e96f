//! API request handlers.

use crate::api::middleware::extract_client_ip;
use crate::error::{ApiError, ErrorResponse};
use crate::format::HandlerOutput;
use crate::models::{HealthResponse, MarketMakersRequest};
use crate::state::AppState;
use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_enabled: state.dispatcher.cache_enabled(),
    })
}

// ============================================================================
// Analytics
// ============================================================================

/// Runs a named analytics route.
///
/// The route segment is matched case-insensitively with underscores
/// ignored, so `marketMakers` and `market_makers` are the same route.
#[utoipa::path(
    post,
    path = "/api/{route}",
    params(
        ("route" = String, Path, description = "Route name, e.g. marketMakers or offersExercised")
    ),
    request_body = MarketMakersRequest,
    responses(
        (status = 200, description = "Route result as JSON, CSV text or a header-first table"),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 404, description = "Unknown route; lists the available routes", body = String),
        (status = 500, description = "Validation or ledger failure", body = ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn api_entry(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<HandlerOutput, ApiError> {
    let origin = extract_client_ip(&request);
    let path = request.uri().path().to_string();
    let body = read_params(request.into_body()).await?;

    state.dispatcher.dispatch(&path, &origin, body).await
}

async fn read_params(body: Body) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
    parse_params(&bytes)
}

/// Parses a request body into route parameters. An empty body is `{}`.
fn parse_params(bytes: &Bytes) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice(bytes) {
        Ok(Value::Object(params)) => Ok(Value::Object(params)),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(err) => Err(ApiError::InvalidBody(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_params(&Bytes::new()).unwrap(), json!({}));
        assert_eq!(parse_params(&Bytes::from_static(b" \n")).unwrap(), json!({}));
    }

    #[test]
    fn test_object_body() {
        let params = parse_params(&Bytes::from_static(br#"{"range":"7d"}"#)).unwrap();
        assert_eq!(params, json!({"range": "7d"}));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = parse_params(&Bytes::from_static(b"[1,2]")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }

    #[test]
    fn test_malformed_body_rejected() {
        let err = parse_params(&Bytes::from_static(b"{range")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }
}
