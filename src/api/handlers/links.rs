//! Handlers for short link management endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, CreatedLinkResponse, ListLinksQuery, UpdateLinkRequest,
};
use crate::api::response::ApiResponse;
use crate::application::services::DeleteResult;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/url`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "custom_short_code": "my-link",          // optional
///   "status": "active",                      // optional
///   "expires_at": "2026-12-31T23:59:59Z"     // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is invalid.
/// Returns 409 Conflict if the custom code is invalid, reserved or taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<ApiResponse<CreatedLinkResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create(
            payload.original_url,
            payload.custom_short_code,
            payload.status,
            payload.expires_at,
        )
        .await?;

    let short_url = state.short_url(&link.short_code);

    Ok(ApiResponse::created(
        "Short URL created successfully",
        CreatedLinkResponse::new(link, short_url),
    ))
}

/// Lists links, newest first.
///
/// `GET /api/url?status=active|inactive`
pub async fn list_links_handler(
    State(state): State<AppState>,
    query: Result<Query<ListLinksQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ShortLink>>, AppError> {
    let Query(query) = query?;
    let links = state.link_service.get_all(query.status).await?;

    Ok(ApiResponse::ok("Urls fetched successfully", links))
}

/// `GET /api/url/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<ShortLink>, AppError> {
    let Path(id) = id?;
    let link = state.link_service.get_by_id(id).await?;

    Ok(ApiResponse::ok("URL retrieved successfully", link))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PUT /api/url/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// {
///   "original_url": "https://new-destination.com",
///   "status": "inactive",
///   "expires_at": null    // clears the expiry
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails or the id is not an integer.
/// Returns 404 Not Found if no link has this id.
pub async fn update_link_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<ApiResponse<ShortLink>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.update(id, payload.into()).await?;

    Ok(ApiResponse::ok("URL updated successfully", link))
}

/// Deletes a link.
///
/// `DELETE /api/url/{id}` always answers 200; `deleted_count` is 0 when the id was
/// already absent.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<DeleteResult>, AppError> {
    let Path(id) = id?;
    let result = state.link_service.delete(id).await?;

    Ok(ApiResponse::ok("URL has been deleted", result))
}

/// `GET /api/url/{id}/stats`
pub async fn link_stats_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<ShortLink>, AppError> {
    let Path(id) = id?;
    let link = state.link_service.get_stats(id).await?;

    Ok(ApiResponse::ok("URL statistics retrieved successfully", link))
}
