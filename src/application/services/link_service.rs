//! Short link lifecycle: create, read, update, delete and stats.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::application::services::code_allocator::CodeAllocator;
use crate::domain::entities::{LinkStatus, NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;

/// Acknowledgment returned by [`LinkService::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Orchestrates short link operations against the record store.
///
/// Each operation is independent and holds no in-process state beyond the
/// repository handle.
pub struct LinkService<R: LinkRepository + ?Sized> {
    link_repository: Arc<R>,
    allocator: CodeAllocator<R>,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<R>) -> Self {
        let allocator = CodeAllocator::new(link_repository.clone());
        Self {
            link_repository,
            allocator,
        }
    }

    /// Creates a short link.
    ///
    /// # Code selection
    ///
    /// - A non-empty `custom_code` is normalized, validated and checked for use
    /// - Otherwise a random code is allocated with bounded collision retry
    ///
    /// `status` defaults to [`LinkStatus::Active`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid.
    /// Returns [`AppError::Conflict`] if the custom code is invalid or taken, or if
    /// the insert hits the unique index.
    pub async fn create(
        &self,
        original_url: String,
        custom_code: Option<String>,
        status: Option<LinkStatus>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortLink, AppError> {
        check_url(&original_url)?;

        let short_code = match custom_code.as_deref().filter(|c| !c.is_empty()) {
            Some(custom) => self.allocator.reserve_custom(custom).await?,
            None => self.allocator.allocate().await?,
        };

        let link = self
            .link_repository
            .insert(NewShortLink {
                original_url,
                short_code,
                status: status.unwrap_or_default(),
                expires_at,
            })
            .await?;

        info!(id = link.id, short_code = %link.short_code, "Short link created");

        Ok(link)
    }

    /// Returns every link, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_all(&self, status: Option<LinkStatus>) -> Result<Vec<ShortLink>, AppError> {
        self.link_repository.list_all(status).await
    }

    /// Returns one link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))
    }

    /// Partially updates a link.
    ///
    /// Only `original_url`, `status` and `expires_at` can change; `updated_at` is
    /// refreshed even when the patch is empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a new URL is invalid.
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn update(&self, id: i64, patch: ShortLinkPatch) -> Result<ShortLink, AppError> {
        if let Some(url) = &patch.original_url {
            check_url(url)?;
        }

        let link = self
            .link_repository
            .update_by_id(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))?;

        debug!(id, short_code = %link.short_code, "Short link updated");

        Ok(link)
    }

    /// Deletes a link.
    ///
    /// Deleting a missing id is not an error: the result reports `deleted_count: 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, AppError> {
        let deleted_count = self.link_repository.delete_by_id(id).await?;
        debug!(id, deleted_count, "Short link delete requested");

        Ok(DeleteResult { deleted_count })
    }

    /// Returns the full record with its click counter and timestamps.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_by_id`].
    pub async fn get_stats(&self, id: i64) -> Result<ShortLink, AppError> {
        self.get_by_id(id).await
    }
}

fn check_url(url: &str) -> Result<(), AppError> {
    validate_url(url).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "original_url", "reason": e.to_string() }),
        )
    })
}
