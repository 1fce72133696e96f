//! Route dispatch for `POST /api/<route>` requests.
//!
//! The inbound path is reduced to a route key and looked up in a table built
//! once at startup. The dispatcher logs each request and its outcome and
//! routes the call through the response cache when one is configured. It
//! carries no business logic of its own.

use crate::cache::CacheWrapper;
use crate::config::RuntimeSettings;
use crate::error::ApiError;
use crate::format::HandlerOutput;
use async_trait::async_trait;
use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Prefix stripped from inbound paths before routing.
pub const API_PREFIX: &str = "/api/";

/// A named analytics operation.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Runs the operation for one request body.
    async fn handle(&self, params: Value) -> Result<HandlerOutput, ApiError>;

    /// The part of a request body that decides the response. Used as the
    /// cache key, so fields the route ignores must not appear in it.
    fn cache_params(&self, params: &Value) -> Value;
}

/// Reduces an inbound path to its route key.
///
/// `/api/Market_Makers/extra` becomes `marketmakers`.
#[must_use]
pub fn normalize_route(raw_path: &str) -> String {
    let path = raw_path
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| raw_path.trim_start_matches('/'));
    let segment = path.split('/').next().unwrap_or_default();
    segment.replace('_', "").to_lowercase()
}

/// Immutable map from route key to handler.
#[derive(Clone, Default)]
pub struct RouteTable {
    handlers: BTreeMap<String, Arc<dyn RouteHandler>>,
}

impl RouteTable {
    /// Starts an empty table.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Handler bound to a normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn RouteHandler>> {
        self.handlers.get(key)
    }

    /// Every registered key, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Collects handlers before the table is frozen.
#[derive(Default)]
pub struct RouteTableBuilder {
    handlers: BTreeMap<String, Arc<dyn RouteHandler>>,
}

impl RouteTableBuilder {
    /// Binds a handler. The name is normalized the same way paths are.
    #[must_use]
    pub fn register(mut self, name: &str, handler: Arc<dyn RouteHandler>) -> Self {
        self.handlers.insert(normalize_route(name), handler);
        self
    }

    /// Freezes the table.
    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            handlers: self.handlers,
        }
    }
}

/// Routes requests to handlers, through the cache when present.
pub struct Dispatcher {
    table: RouteTable,
    cache: Option<CacheWrapper>,
    settings: RuntimeSettings,
}

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(table: RouteTable, cache: Option<CacheWrapper>, settings: RuntimeSettings) -> Self {
        Self {
            table,
            cache,
            settings,
        }
    }

    /// Route table in use.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Whether responses are currently being cached.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache.as_ref().is_some_and(CacheWrapper::is_enabled)
    }

    /// Dispatches one request.
    ///
    /// # Arguments
    /// * `raw_path` - Request path, e.g. `/api/marketMakers`.
    /// * `origin` - Remote address, for logging.
    /// * `body` - Parsed request body.
    ///
    /// # Errors
    /// Returns `RouteNotFound` for unknown routes, otherwise whatever the
    /// handler returns.
    pub async fn dispatch(
        &self,
        raw_path: &str,
        origin: &str,
        body: Value,
    ) -> Result<HandlerOutput, ApiError> {
        let path = raw_path.strip_prefix(API_PREFIX).unwrap_or(raw_path);
        info!(origin = %origin, path = %path, at = %Utc::now(), "Request: POST");
        if self.settings.debug {
            debug!(path = %path, body = %body, "Request body");
        }

        let result = self.route(raw_path, body).await;

        match &result {
            Ok(_) => info!(origin = %origin, path = %path, at = %Utc::now(), "Response 200 OK"),
            Err(ApiError::RouteNotFound { .. }) => {
                info!(origin = %origin, path = %path, at = %Utc::now(), "Response 404 Not Found")
            }
            Err(err) => {
                error!(
                    origin = %origin,
                    path = %path,
                    at = %Utc::now(),
                    error = %err,
                    "(Server Error) 500"
                )
            }
        }

        result
    }

    async fn route(&self, raw_path: &str, body: Value) -> Result<HandlerOutput, ApiError> {
        let key = normalize_route(raw_path);
        let handler = self
            .table
            .get(&key)
            .ok_or_else(|| ApiError::RouteNotFound {
                route: key.clone(),
                available: self.table.keys(),
            })?;

        match &self.cache {
            Some(cache) => {
                let cache_key = CacheWrapper::key(&key, &handler.cache_params(&body));
                cache
                    .get_or_compute(&cache_key, || handler.handle(body))
                    .await
            }
            None => handler.handle(body).await,
        }
    }
}

impl IntoResponse for HandlerOutput {
    fn into_response(self) -> Response {
        match self {
            HandlerOutput::Json(value) => Json(value).into_response(),
            HandlerOutput::Text(text) => text.into_response(),
        }
    }
}
