use crate::api::{handlers, AppState};
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Prefix of the search endpoints
pub const SEARCH_PREFIX: &str = "/api/v1/businesses/search";

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let search = Router::new()
        .route("/facets", get(handlers::business_search))
        .route("/parties", get(handlers::party_search))
        .route("/suggest", get(handlers::business_suggest));

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::health_check))
        // Search
        .nest(SEARCH_PREFIX, search)
        // Add state
        .with_state(state)
        // Add middleware
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
