//! HTTP client for the gateway API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:5993").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5993".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Ledger Gateway API.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of an analytics route.
    ///
    /// # Errors
    /// Returns `InvalidRequest` if the route name is empty.
    pub fn route_url(&self, route: &str) -> Result<String, Error> {
        let route = route.trim_matches('/');
        if route.is_empty() {
            return Err(Error::InvalidRequest("route name is empty".to_string()));
        }
        Ok(format!("{}/api/{}", self.base_url, route))
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Market Makers
    // ========================================================================

    /// Ranked participants as a JSON envelope.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn market_makers(
        &self,
        query: &MarketMakersQuery,
    ) -> Result<MarketMakersResponse, Error> {
        let query = MarketMakersQuery {
            format: Some(Format::Json),
            ..query.clone()
        };
        let resp = self.post("marketMakers", &query).await?;
        self.handle_response(resp).await
    }

    /// Ranked participants as CSV text.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn market_makers_csv(&self, query: &MarketMakersQuery) -> Result<String, Error> {
        let query = MarketMakersQuery {
            format: Some(Format::Csv),
            ..query.clone()
        };
        let resp = self.post("marketMakers", &query).await?;
        self.handle_text_response(resp).await
    }

    /// Ranked participants as a header-first table.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn market_makers_table(
        &self,
        query: &MarketMakersQuery,
    ) -> Result<TableResponse, Error> {
        let query = MarketMakersQuery {
            format: None,
            ..query.clone()
        };
        let resp = self.post("marketMakers", &query).await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Offers Exercised
    // ========================================================================

    /// Exercised offers as a JSON envelope.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn offers_exercised(
        &self,
        query: &OffersExercisedQuery,
    ) -> Result<OffersExercisedResponse, Error> {
        let query = OffersExercisedQuery {
            format: Some(Format::Json),
            ..query.clone()
        };
        let resp = self.post("offersExercised", &query).await?;
        self.handle_response(resp).await
    }

    /// Exercised offers as a header-first table.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn offers_exercised_table(
        &self,
        query: &OffersExercisedQuery,
    ) -> Result<TableResponse, Error> {
        let query = OffersExercisedQuery {
            format: None,
            ..query.clone()
        };
        let resp = self.post("offersExercised", &query).await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Raw Access
    // ========================================================================

    /// Posts an arbitrary body to an arbitrary route and returns the body text.
    ///
    /// # Errors
    /// Returns error if the request fails or the gateway answers with an error.
    pub async fn post_raw(&self, route: &str, body: &serde_json::Value) -> Result<String, Error> {
        let resp = self.post(route, body).await?;
        self.handle_text_response(resp).await
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    async fn post<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<reqwest::Response, Error> {
        let url = self.route_url(route)?;
        Ok(self.client.post(&url).json(body).send().await?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let text = self.handle_text_response(resp).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn handle_text_response(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.text().await?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::NotFound(text))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
