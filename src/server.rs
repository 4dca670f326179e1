//! HTTP endpoints for the assembled document.
//!
//! - `GET /{prefix}/spec` returns the document as JSON
//! - `GET /{prefix}` redirects to the configured Swagger UI, pointing it at
//!   the spec endpoint

use crate::api_doc::ApiDoc;
use crate::error::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use log::{debug, info};
use std::net::SocketAddr;
use std::sync::Arc;

/// Frozen state shared by the handlers
#[derive(Clone)]
struct DocState {
    /// The document, rendered to JSON once
    document: Bytes,
    url_prefix: Arc<str>,
    swagger_ui_url: Arc<str>,
}

impl ApiDoc {
    /// Freeze the registrations and build the documentation router.
    ///
    /// Consuming `self` ends the registration phase. The document is rendered
    /// here and every request is answered with the same bytes.
    pub fn into_router(self) -> Result<Router> {
        let document = self.document();
        let path_count = document.paths.len();
        let state = DocState {
            document: Bytes::from(serde_json::to_vec(&document)?),
            url_prefix: Arc::from(self.config().url_prefix.as_str()),
            swagger_ui_url: Arc::from(self.config().swagger_ui_url.as_str()),
        };
        let index = format!("/{}", state.url_prefix);
        let spec = format!("/{}/spec", state.url_prefix);
        info!(
            "Serving {} paths at {} (UI redirect at {})",
            path_count,
            spec,
            index
        );

        Ok(Router::new()
            .route(&spec, get(spec_handler))
            .route(&index, get(index_handler))
            .with_state(state))
    }
}

async fn spec_handler(State(state): State<DocState>) -> impl IntoResponse {
    debug!("Serving spec document");
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        state.document,
    )
}

async fn index_handler(
    State(state): State<DocState>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let scheme = request_scheme(&uri, &headers);
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let location = redirect_location(&state.swagger_ui_url, scheme, host, &state.url_prefix);
    debug!("Redirecting to {}", location);
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

/// `https` when the request arrived over TLS, directly or via a proxy.
fn request_scheme(uri: &Uri, headers: &HeaderMap) -> &'static str {
    let forwarded_https = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    if forwarded_https || uri.scheme_str() == Some("https") {
        "https"
    } else {
        "http"
    }
}

/// Swagger UI address with the spec URL as its `url` query parameter.
pub fn redirect_location(ui_url: &str, scheme: &str, host: &str, url_prefix: &str) -> String {
    let spec_url = format!("{}://{}/{}/spec", scheme, host, url_prefix);
    let encoded: String = form_urlencoded::byte_serialize(spec_url.as_bytes()).collect();
    format!("{}?url={}", ui_url, encoded)
}

/// Serve the documentation router until ctrl-c.
pub async fn serve(router: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_redirect_location_encodes_spec_url() {
        let location = redirect_location(
            "http://petstore.swagger.io/",
            "http",
            "example.com:8080",
            "apidoc",
        );
        assert_eq!(
            location,
            "http://petstore.swagger.io/?url=http%3A%2F%2Fexample.com%3A8080%2Fapidoc%2Fspec"
        );
    }

    #[test]
    fn test_request_scheme() {
        let uri: Uri = "/apidoc".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(request_scheme(&uri, &headers), "http");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS"));
        assert_eq!(request_scheme(&uri, &headers), "https");

        let absolute: Uri = "https://example.com/apidoc".parse().unwrap();
        assert_eq!(request_scheme(&absolute, &HeaderMap::new()), "https");
    }
}
