//! Per-client rate limiting using the token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::config::Config;

/// Rate limiter keyed by the socket peer address.
pub type PeerRateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter keyed by the forwarded client address.
pub type ProxiedRateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter from `THROTTLER_TTL` / `THROTTLER_LIMIT`.
///
/// # Limits
///
/// - **Burst**: `THROTTLER_LIMIT` requests
/// - **Refill**: one token every `THROTTLER_TTL * 1000 / THROTTLER_LIMIT` ms
///
/// So each client may spend `limit` requests per `ttl` window. Requests exceeding
/// the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the socket peer
/// address, so the router must be served with `ConnectInfo<SocketAddr>`.
///
/// # Errors
///
/// Returns an error if the limiter settings are rejected by the builder.
pub fn layer(config: &Config) -> Result<PeerRateLimitLayer> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(config.throttler_period_ms())
            .burst_size(config.throttler_limit)
            .finish()
            .context("Invalid rate limiter settings")?,
    );

    Ok(GovernorLayer::new(governor_conf))
}

/// Same as [`layer`], but the client IP comes from `X-Forwarded-For`, `X-Real-IP` or
/// `Forwarded`, falling back to the peer address.
///
/// Use only behind a trusted reverse proxy: clients can forge these headers.
pub fn proxied_layer(config: &Config) -> Result<ProxiedRateLimitLayer> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_millisecond(config.throttler_period_ms())
            .burst_size(config.throttler_limit)
            .finish()
            .context("Invalid rate limiter settings")?,
    );

    Ok(GovernorLayer::new(governor_conf))
}
