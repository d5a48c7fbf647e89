//! DTOs for the short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{LinkStatus, ShortLink, ShortLinkPatch};

/// Request body for `POST /api/url`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (http or https).
    #[validate(url(message = "Invalid URL format"), length(max = 2048))]
    pub original_url: String,

    /// Optional custom code. It is normalized before use, so characters outside
    /// `[a-zA-Z0-9_-]` are dropped rather than rejected here.
    #[validate(length(max = 255))]
    pub custom_short_code: Option<String>,

    /// Defaults to `active`.
    pub status: Option<LinkStatus>,

    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PUT /api/url/{id}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"), length(max = 2048))]
    pub original_url: Option<String>,

    pub status: Option<LinkStatus>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateLinkRequest> for ShortLinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        ShortLinkPatch {
            original_url: req.original_url,
            status: req.status,
            expires_at: req.expires_at,
        }
    }
}

/// Query string for `GET /api/url`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub status: Option<LinkStatus>,
}

/// Data returned after a link is created.
#[derive(Debug, Serialize)]
pub struct CreatedLinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub status: LinkStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CreatedLinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            status: link.status,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}
