//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler, index_handler,
    link_stats_handler, list_links_handler, redirect_handler, status_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, relative to the `/api` prefix.
///
/// # Endpoints
///
/// - `GET    /`                - Greeting
/// - `GET    /status`          - Liveness probe
/// - `GET    /health`          - Health check with store probe
/// - `POST   /url`             - Create a short link
/// - `GET    /url`             - List links (`?status=active|inactive`)
/// - `GET    /url/{id}`        - Fetch one link
/// - `PUT    /url/{id}`        - Partially update a link
/// - `DELETE /url/{id}`        - Delete a link
/// - `GET    /url/{id}/stats`  - Link statistics
/// - `GET    /{code}`          - Redirect to the original URL
///
/// Fixed segments win over `/{code}`, which is why `status`, `health` and `url` are
/// reserved and never issued as short codes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/url", get(list_links_handler).post(create_link_handler))
        .route(
            "/url/{id}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/url/{id}/stats", get(link_stats_handler))
        .route("/{code}", get(redirect_handler))
}

/// API routes with state attached and no rate limiting.
///
/// Does not require `ConnectInfo`, so it can be driven directly in tests.
pub fn api_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes()).with_state(state)
}
