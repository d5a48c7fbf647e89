//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/api/*` - REST API and short link redirects, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `config` - rate limiter settings; with `behind_proxy` the client IP is read from
///   `X-Forwarded-For` / `X-Real-IP` instead of the peer socket address
///
/// The returned service must be served with `ConnectInfo<SocketAddr>`.
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be built from `config`.
pub fn app_router(state: AppState, config: &Config) -> anyhow::Result<NormalizePath<Router>> {
    let api_router = if config.behind_proxy {
        api::routes::api_routes().layer(rate_limit::proxied_layer(config)?)
    } else {
        api::routes::api_routes().layer(rate_limit::layer(config)?)
    };

    let router = Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
