//! Handler for the shorten endpoint.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenParams, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates or returns the short code for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten?longUrl=<url>`
///
/// # Response
///
/// ```json
/// { "status": "inserted", "id": "1c" }
/// ```
///
/// `status` is `existing` when the URL had already been shortened.
///
/// # Errors
///
/// - `400` if `longUrl` is missing, empty or repeated
/// - `503` if the id allocator is not ready yet
/// - `500` on store errors
pub async fn shorten_handler(
    State(state): State<AppState>,
    params: Result<Query<ShortenParams>, QueryRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let long_url = params.long_url.unwrap_or_default();
    let shortened = state.shorten_service.shorten(&long_url).await?;

    Ok(Json(shortened.into()))
}
