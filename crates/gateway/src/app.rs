//! HTTP application assembly: routes plus the middleware stack.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use tb_domain::config::CorsConfig;

use crate::api;
use crate::state::AppState;

/// In-flight request cap used when `TB_MAX_CONCURRENT_REQUESTS` is unset.
pub const DEFAULT_MAX_CONCURRENT: usize = 256;

/// Read the concurrency cap from the environment.
pub fn max_concurrent_from_env() -> usize {
    std::env::var("TB_MAX_CONCURRENT_REQUESTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_CONCURRENT)
}

/// Build the complete application: API routes, CORS, request tracing and
/// a global concurrency limit.
///
/// Routed responses always carry the allowed methods and headers, not only
/// preflight responses.
pub fn build_app(state: AppState, max_concurrent: usize) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors);

    api::router()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS_VALUE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS_VALUE),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent))
        .with_state(state)
}

const ALLOWED_METHODS_VALUE: &str = "GET,PUT,POST,DELETE,OPTIONS";
const ALLOWED_HEADERS_VALUE: &str = "Content-Type,Authorization";

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build a [`CorsLayer`] from the configured allowed origins.
///
/// A lone `"*"` allows every origin. Entries ending in `:*` match any port
/// on that host (e.g. `http://localhost:*`); everything else must match
/// exactly.
pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if cors.is_wildcard() {
        return base.allow_origin(Any);
    }

    let mut exact: Vec<HeaderValue> = Vec::new();
    let mut wildcard_prefixes: Vec<String> = Vec::new();

    for origin in &cors.allowed_origins {
        if origin.ends_with(":*") {
            wildcard_prefixes.push(origin.trim_end_matches('*').to_owned());
        } else if let Ok(hv) = origin.parse::<HeaderValue>() {
            exact.push(hv);
        } else {
            tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
        }
    }

    let allow_origin = if wildcard_prefixes.is_empty() {
        AllowOrigin::list(exact)
    } else {
        AllowOrigin::predicate(move |origin, _| {
            if exact.iter().any(|e| e.as_bytes() == origin.as_bytes()) {
                return true;
            }
            let origin = origin.to_str().unwrap_or("");
            wildcard_prefixes
                .iter()
                .any(|prefix| matches_port_wildcard(origin, prefix))
        })
    };

    base.allow_origin(allow_origin)
}

/// `prefix` is an origin up to and including the `:` before the port.
fn matches_port_wildcard(origin: &str, prefix: &str) -> bool {
    origin
        .strip_prefix(prefix)
        .map(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
