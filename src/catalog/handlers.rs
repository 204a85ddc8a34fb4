use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::info;

use super::gateway::{json_body, GatewayError};
use super::types::CatalogRequest;
use crate::intent::require_search_term;
use crate::server::AppState;
use crate::util::QueryParams;

/// GET /api/movies?path=<route>&... relays a catalog query.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, GatewayError> {
    state.catalog.ensure_configured()?;
    let req = CatalogRequest::from_query(&params).ok_or(GatewayError::MissingPath)?;

    let body = state.catalog.forward(&req).await?;
    Ok(json_body(body))
}

/// GET /api/search?q=<text>: translate the text, then run the resulting query.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, Response> {
    let term = require_search_term(&params)?;

    let intent = state
        .intent
        .parse(term)
        .await
        .unwrap_or_else(|never| match never {});
    info!(term = %term, path = %intent.path, "Searching catalog");

    let body = state
        .catalog
        .forward(&CatalogRequest::from_intent(&intent))
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(json_body(body))
}
