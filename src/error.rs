//! Error types for the REST API.

use crate::ledger::LedgerError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

#[cfg(test)]
mod tests;

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// Which side of an instrument pair a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Base instrument.
    Base,
    /// Counter instrument.
    Counter,
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Counter => write!(f, "counter"),
        }
    }
}

/// Instrument pair validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentError {
    /// The instrument is not an object or its currency is not a string.
    #[error("invalid {0} currency")]
    Malformed(Leg),

    /// The instrument has no currency code.
    #[error("{0} currency is required")]
    MissingCurrency(Leg),

    /// A non-native instrument has no issuer.
    #[error("{0} issuer is required")]
    MissingIssuer(Leg),

    /// The native unit was given an issuer.
    #[error("{0} cannot have an issuer")]
    NativeWithIssuer(String),

    /// A base was supplied without a counter.
    #[error("counter currency is required")]
    CounterRequired,

    /// A counter was supplied without a base.
    #[error("base currency is required")]
    BaseRequired,
}

impl InstrumentError {
    /// Machine-readable code for the error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(Leg::Base) => "INVALID_BASE_INSTRUMENT",
            Self::Malformed(Leg::Counter) => "INVALID_COUNTER_INSTRUMENT",
            Self::MissingCurrency(_) => "MISSING_CURRENCY",
            Self::MissingIssuer(_) => "MISSING_ISSUER",
            Self::NativeWithIssuer(_) => "NATIVE_WITH_ISSUER",
            Self::CounterRequired => "MISSING_COUNTERPARTY",
            Self::BaseRequired => "BASE_REQUIRED",
        }
    }
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No handler is registered for the normalized route.
    #[error(
        "Sorry, that API route doesn't seem to exist. Available paths are: {}",
        .available.join(", ")
    )]
    RouteNotFound {
        /// Normalized route key that missed.
        route: String,
        /// Every registered route key.
        available: Vec<String>,
    },

    /// A request parameter could not be interpreted.
    #[error("{0}")]
    InvalidParameter(String),

    /// Instrument pair validation failed.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// One of the fan-out sub-queries failed.
    #[error("{0}")]
    SubQueryFailure(String),

    /// Request body is not a JSON object.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::RouteNotFound { .. } => {
                return (StatusCode::NOT_FOUND, format!("{}\n", self)).into_response();
            }
            ApiError::InvalidParameter(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_PARAMETER")
            }
            ApiError::Instrument(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.code()),
            ApiError::SubQueryFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SUB_QUERY_FAILURE")
            }
            ApiError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::SubQueryFailure(err.to_string())
    }
}
