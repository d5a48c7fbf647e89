//! Short code allocation with bounded collision retry.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, FALLBACK_CODE_LENGTH, clean_code, generate_code, is_reserved_code,
    is_valid_code,
};

/// Number of regular-length candidates tried before falling back to a longer code.
pub const MAX_ATTEMPTS: usize = 10;

/// Picks short codes that are free in the store at check time.
///
/// The existence checks are only a fast path: the insert that follows is not atomic
/// with them, and the store's unique index on `short_code` stays the final arbiter.
pub struct CodeAllocator<R: LinkRepository + ?Sized> {
    link_repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> CodeAllocator<R> {
    pub fn new(link_repository: Arc<R>) -> Self {
        Self { link_repository }
    }

    /// Allocates a generated code.
    ///
    /// Tries up to [`MAX_ATTEMPTS`] codes of length 8 and returns the first one that
    /// does not exist. When every attempt collides, a single code of length 12 is
    /// returned without checking it.
    ///
    /// # Errors
    ///
    /// Propagates store errors from the existence checks.
    pub async fn allocate(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let code = generate_code(DEFAULT_CODE_LENGTH);

            if !self.link_repository.exists_by_code(&code).await? {
                debug!(attempt, "Allocated short code");
                return Ok(code);
            }

            debug!(attempt, "Short code collision");
        }

        warn!(
            attempts = MAX_ATTEMPTS,
            "All regular short codes collided, issuing a long fallback code"
        );

        Ok(generate_code(FALLBACK_CODE_LENGTH))
    }

    /// Normalizes, validates and checks a caller-supplied code.
    ///
    /// Returns the normalized code, which may differ from `custom`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the normalized code has an invalid format, is
    /// reserved for a fixed route or is already used. Propagates store errors.
    pub async fn reserve_custom(&self, custom: &str) -> Result<String, AppError> {
        let code = clean_code(custom);

        if !is_valid_code(&code) {
            return Err(AppError::conflict(
                "Invalid custom short code format",
                json!({ "provided": custom, "normalized": code }),
            ));
        }

        if is_reserved_code(&code) {
            return Err(AppError::conflict(
                "This code is reserved",
                json!({ "code": code }),
            ));
        }

        if self.link_repository.exists_by_code(&code).await? {
            return Err(AppError::conflict(
                "Custom short code already exists",
                json!({ "code": code }),
            ));
        }

        Ok(code)
    }
}
