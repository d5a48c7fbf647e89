//! ShortLink entity representing a short code to destination URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a short link may currently be used for redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "INACTIVE")]
    Inactive,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or supplied status string is unknown.
#[derive(Debug, thiserror::Error)]
#[error("unknown link status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for LinkStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LinkStatus::Active),
            "inactive" => Ok(LinkStatus::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted short link with its click counter and lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub status: LinkStatus,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if `expires_at` is set and strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A link is redirectable iff it is active and not expired.
    pub fn is_resolvable(&self) -> bool {
        self.status == LinkStatus::Active && !self.is_expired()
    }
}

/// Input data for inserting a new short link.
///
/// `id`, `click_count` and the timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub original_url: String,
    pub short_code: String,
    pub status: LinkStatus,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing short link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
/// `short_code` and `click_count` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortLinkPatch {
    pub original_url: Option<String>,
    pub status: Option<LinkStatus>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
