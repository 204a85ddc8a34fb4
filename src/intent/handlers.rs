use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::SearchIntent;
use crate::catalog::ErrorEnvelope;
use crate::server::AppState;
use crate::util::QueryParams;

pub const SEARCH_TERM_PARAM: &str = "q";

/// The trimmed search text, or a 400 response when it is missing or blank.
pub fn require_search_term(params: &QueryParams) -> Result<&str, Response> {
    params.get_trimmed(SEARCH_TERM_PARAM).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new("Missing required parameter: q")),
        )
            .into_response()
    })
}

/// GET /api/search-intent?q=<text>
pub async fn parse_search(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SearchIntent>, Response> {
    let term = require_search_term(&params)?;
    let intent = state
        .intent
        .parse(term)
        .await
        .unwrap_or_else(|never| match never {});
    Ok(Json(intent))
}
