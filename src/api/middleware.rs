//! Request helpers shared by the HTTP front.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderName, HeaderValue, Method, Request, header};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// Methods advertised to cross-origin callers.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
];

/// `Access-Control-Allow-Methods` value sent on every response.
pub const ALLOW_METHODS_VALUE: &str = "GET,PUT,POST,DELETE,OPTIONS";

/// `Access-Control-Allow-Headers` value sent on every response.
pub const ALLOW_HEADERS_VALUE: &str = "Content-Type, Authorization, Content-Length, X-Requested-With";

/// Cross-origin policy. Answers preflights and sets the allowed origin.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::CONTENT_LENGTH,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Sets the allowed methods list on every response, not only preflights.
#[must_use]
pub fn allow_methods_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS_VALUE),
    )
}

/// Sets the allowed headers list on every response, not only preflights.
#[must_use]
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS_VALUE),
    )
}

/// Extract client IP from request.
///
/// Proxy headers win over the socket address.
pub fn extract_client_ip(request: &Request<Body>) -> String {
    if let Some(forwarded) = request.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        return ip.trim().to_string();
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP")
        && let Ok(value) = real_ip.to_str()
    {
        return value.trim().to_string();
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/api/marketMakers")
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let req = request()
            .header("X-Forwarded-For", "10.0.0.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&req), "10.0.0.1");
    }

    #[test]
    fn test_real_ip() {
        let req = request()
            .header("X-Real-IP", "192.168.1.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&req), "192.168.1.7");
    }

    #[test]
    fn test_connect_info() {
        let mut req = request().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        assert_eq!(extract_client_ip(&req), "127.0.0.1");
    }

    #[test]
    fn test_unknown() {
        let req = request().body(Body::empty()).unwrap();
        assert_eq!(extract_client_ip(&req), "unknown");
    }
}
