use crate::api::params::{self, SearchQueryParams, SuggestQueryParams};
use crate::api::AppState;
use crate::error::Result;
use crate::search::{SearchEnvelope, SuggestResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Faceted business search
pub async fn business_search(
    State(state): State<AppState>,
    Query(raw): Query<SearchQueryParams>,
) -> Result<Json<SearchEnvelope>> {
    let params = params::business_params(&raw)?;
    let envelope = state.search.business_search(&params).await?;
    Ok(Json(envelope))
}

/// Faceted party search
pub async fn party_search(
    State(state): State<AppState>,
    Query(raw): Query<SearchQueryParams>,
) -> Result<Json<SearchEnvelope>> {
    let params = params::party_params(&raw, &state.search.config().party_roles)?;
    let envelope = state.search.party_search(&params).await?;
    Ok(Json(envelope))
}

/// Typeahead suggestions
pub async fn business_suggest(
    State(state): State<AppState>,
    Query(raw): Query<SuggestQueryParams>,
) -> Result<Json<SuggestResponse>> {
    let request = raw.parse()?;
    let response = state
        .search
        .business_suggest(&request.term, request.highlight, request.rows)
        .await?;
    Ok(Json(response))
}
