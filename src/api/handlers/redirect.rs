//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::response::ApiResponse;
use crate::application::services::ResolvedLink;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::to_header_url;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/{code}`
///
/// # Request Flow
///
/// 1. Look up the code among active links
/// 2. Reject expired links
/// 3. Spawn the click increment (fire-and-forget)
/// 4. Return 302 Found with `Location` (percent-encoded) and the resolved link in the body
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist, is inactive or has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<ApiResponse<ResolvedLink>, AppError> {
    let resolved = state.redirect_service.resolve(&code).await?;
    let location = to_header_url(&resolved.original_url);

    Ok(ApiResponse::new(StatusCode::FOUND, "Redirect URL found", resolved).with_location(location))
}
