use std::sync::Arc;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// - `/api/lead` is called cross-origin by the marketing site's contact form,
///   so every response on it (including 405 and 500) carries permissive CORS
///   headers. The layers sit on the method router so they also wrap its
///   fallback.
/// - `/api/track` is only reached by same-origin beacons and sets no CORS
///   headers.
/// - `TraceLayer` wraps everything for request/response logging.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ));

    let lead = post(routes::lead::submit)
        .options(routes::lead::preflight)
        .fallback(routes::lead::method_not_allowed)
        .layer(cors);

    let track = post(routes::track::track).fallback(routes::track::method_not_allowed);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/lead", lead)
        .route("/api/track", track)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
