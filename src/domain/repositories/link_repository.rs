//! Repository trait for short link data access.

use crate::domain::entities::{LinkStatus, NewShortLink, ShortLink, ShortLinkPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Record store for short links.
///
/// The store is the single source of truth and the only synchronization point:
/// code uniqueness and counter correctness rely on its atomic operations, never on
/// application-side locking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code, optionally restricted to a status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(
        &self,
        code: &str,
        status: Option<LinkStatus>,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if any link (whatever its status) uses `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Returns `Ok(None)` when no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update_by_id(
        &self,
        id: i64,
        patch: ShortLinkPatch,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Atomically adds one to `click_count` and returns the updated link.
    ///
    /// Returns `Ok(None)` when the code is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Removes a link and returns the number of removed records (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError>;

    /// Lists links ordered by creation time, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self, status: Option<LinkStatus>) -> Result<Vec<ShortLink>, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
