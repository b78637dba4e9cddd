//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware::Limits, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// `/entries/open` carries the container as base64 inside JSON, so it gets
/// its own body cap derived from [`Limits::open_body_bytes`].
pub fn build(state: AppState, limits: Limits) -> Router {
    Router::new()
        .route("/entries/seal", post(handlers::seal))
        .route(
            "/entries/open",
            post(handlers::open).layer(DefaultBodyLimit::max(limits.open_body_bytes())),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(CompressionLayer::new())
        .with_state(state)
}
