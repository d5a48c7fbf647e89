//! Redirect resolution and click accounting.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::entities::LinkStatus;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Destination served for a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub original_url: String,
    pub short_code: String,
    /// Stored count plus the click being served, before the increment is durable.
    pub click_count: i64,
}

/// Decides whether a code is redirectable and records the click.
pub struct RedirectService<R: LinkRepository + ?Sized> {
    link_repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized + 'static> RedirectService<R> {
    pub fn new(link_repository: Arc<R>) -> Self {
        Self { link_repository }
    }

    /// Resolves a short code to its destination.
    ///
    /// # Request flow
    ///
    /// 1. Look the code up among active links
    /// 2. Reject it if `expires_at` is strictly in the past
    /// 3. Spawn a detached click increment and answer immediately
    ///
    /// The increment is fire-and-forget: its outcome never reaches the caller and a
    /// failure is only logged. Concurrent clicks stay correct because the store
    /// increments atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is absent or inactive.
    /// Returns [`AppError::Expired`] if the link has expired.
    /// Returns [`AppError::Internal`] on store errors during the lookup.
    pub async fn resolve(&self, code: &str) -> Result<ResolvedLink, AppError> {
        let link = self
            .link_repository
            .find_by_code(code, Some(LinkStatus::Active))
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found or inactive", json!({ "code": code }))
            })?;

        if link.is_expired_at(Utc::now()) {
            return Err(AppError::expired(
                "Short URL has expired",
                json!({ "code": code, "expires_at": link.expires_at }),
            ));
        }

        self.record_click(link.short_code.clone());

        Ok(ResolvedLink {
            click_count: link.click_count + 1,
            original_url: link.original_url,
            short_code: link.short_code,
        })
    }

    /// Spawns the click increment for `code`.
    ///
    /// The returned handle is dropped by [`Self::resolve`]; it is only exposed so the
    /// task can be awaited where that matters (shutdown, tests).
    pub fn record_click(&self, code: String) -> JoinHandle<()> {
        let repository = Arc::clone(&self.link_repository);

        tokio::spawn(async move {
            match repository.increment_click_count(&code).await {
                Ok(Some(link)) => {
                    debug!(short_code = %code, click_count = link.click_count, "Click recorded");
                }
                Ok(None) => {
                    debug!(short_code = %code, "Click dropped, link no longer exists");
                }
                Err(e) => {
                    debug!(short_code = %code, error = %e, "Click increment failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ShortLink;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::{DateTime, Duration};
    use tokio::sync::mpsc;

    fn active_link(code: &str, click_count: i64, expires_at: Option<DateTime<Utc>>) -> ShortLink {
        let now = Utc::now();
        ShortLink {
            id: 1,
            original_url: "https://example.com".to_string(),
            short_code: code.to_string(),
            status: LinkStatus::Active,
            click_count,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_resolve_success_reports_optimistic_count() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code, status| code == "abc-1" && *status == Some(LinkStatus::Active))
            .times(1)
            .returning(|code, _| Ok(Some(active_link(code, 4, None))));
        repo.expect_increment_click_count()
            .times(1)
            .returning(move |code| {
                let _ = tx.send(code.to_string());
                Ok(Some(active_link(code, 5, None)))
            });

        let service = RedirectService::new(Arc::new(repo));
        let resolved = service.resolve("abc-1").await.unwrap();

        assert_eq!(
            resolved,
            ResolvedLink {
                original_url: "https://example.com".to_string(),
                short_code: "abc-1".to_string(),
                click_count: 5,
            }
        );
        assert_eq!(rx.recv().await.as_deref(), Some("abc-1"));
    }

    #[tokio::test]
    async fn test_resolve_not_found_or_inactive() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_increment_click_count().times(0);

        let service = RedirectService::new(Arc::new(repo));
        let err = service.resolve("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Short URL not found or inactive");
    }

    #[tokio::test]
    async fn test_resolve_expired_one_second_ago() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|code, _| {
            Ok(Some(active_link(
                code,
                0,
                Some(Utc::now() - Duration::seconds(1)),
            )))
        });
        repo.expect_increment_click_count().times(0);

        let service = RedirectService::new(Arc::new(repo));
        let err = service.resolve("old").await.unwrap_err();

        assert!(matches!(err, AppError::Expired { .. }));
        assert_eq!(err.to_string(), "Short URL has expired");
    }

    #[tokio::test]
    async fn test_resolve_expiring_in_one_second_succeeds() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|code, _| {
            Ok(Some(active_link(
                code,
                0,
                Some(Utc::now() + Duration::seconds(1)),
            )))
        });
        repo.expect_increment_click_count()
            .times(1)
            .returning(move |_| {
                let _ = tx.send(());
                Ok(None)
            });

        let service = RedirectService::new(Arc::new(repo));
        let resolved = service.resolve("soon").await.unwrap();

        assert_eq!(resolved.click_count, 1);
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_increment_failure_does_not_fail_resolve() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code, _| Ok(Some(active_link(code, 0, None))));
        repo.expect_increment_click_count()
            .times(1)
            .returning(move |_| {
                let _ = tx.send(());
                Err(AppError::internal("Database error", json!({})))
            });

        let service = RedirectService::new(Arc::new(repo));
        let resolved = service.resolve("flaky").await;

        assert!(resolved.is_ok());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let service = RedirectService::new(Arc::new(repo));
        let err = service.resolve("any").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }
}
