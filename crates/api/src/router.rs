//! Top-level router for the habits service.
//!
//! `main.rs` and the integration tests both go through [`build_app_router`],
//! so every request sees the same layers.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Preflight responses may be cached by the browser for an hour.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Methods the habit routes answer to.
const HABIT_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Assemble `/health` and the `/api/v1` tree, then wrap them in the service
/// layers.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let routes = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes());

    with_service_layers(routes, config).with_state(state)
}

/// Each `.layer` wraps everything above it, so the last one sees the request
/// first. Outermost first: CORS, request id assignment, tracing, request id
/// echo, timeout, panic recovery.
fn with_service_layers(routes: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    routes
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(build_cors_layer(config))
}

/// One span per request, tagged with the id assigned by `SetRequestIdLayer`.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    tracing::info_span!(
        "http.request",
        request_id,
        method = %request.method(),
        route = %request.uri().path(),
    )
}

/// CORS for the browser client: the configured origins may call the habit
/// routes with a bearer token.
///
/// # Panics
///
/// Panics if a configured origin is not a valid header value. This runs
/// once at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => value,
            Err(err) => panic!("CORS_ORIGINS entry '{origin}' is not a valid origin: {err}"),
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(HABIT_METHODS)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
