//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkStatus, NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Row shape shared by every query that returns a link.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    short_code: String,
    status: String,
    click_count: i64,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for ShortLink {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<LinkStatus>().map_err(|e| {
            AppError::internal(
                "Corrupted link record",
                json!({ "id": row.id, "reason": e.to_string() }),
            )
        })?;

        Ok(ShortLink {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            status,
            click_count: row.click_count,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_link(row: Option<LinkRow>) -> Result<Option<ShortLink>, AppError> {
    row.map(ShortLink::try_from).transpose()
}

/// PostgreSQL repository for short links.
///
/// Uniqueness of `short_code` is enforced by the `short_links_short_code_key` index,
/// and click counting uses a single atomic `UPDATE ... RETURNING`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_code(
        &self,
        code: &str,
        status: Option<LinkStatus>,
    ) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, status, click_count,
                   expires_at, created_at, updated_at
            FROM short_links
            WHERE short_code = $1
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(code)
        .bind(status.map(|s| s.as_str()))
        .fetch_optional(self.pool.as_ref())
        .await?;

        into_link(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, status, click_count,
                   expires_at, created_at, updated_at
            FROM short_links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        into_link(row)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM short_links WHERE short_code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO short_links (original_url, short_code, status, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, short_code, status, click_count,
                      expires_at, created_at, updated_at
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(new_link.status.as_str())
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            match err {
                AppError::Conflict { .. } => AppError::conflict(
                    "Short code already exists",
                    json!({ "code": new_link.short_code }),
                ),
                other => other,
            }
        })?;

        ShortLink::try_from(row)
    }

    async fn update_by_id(
        &self,
        id: i64,
        patch: ShortLinkPatch,
    ) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE short_links
            SET original_url = COALESCE($2, original_url),
                status       = COALESCE($3, status),
                expires_at   = CASE WHEN $4 THEN $5 ELSE expires_at END,
                updated_at   = NOW()
            WHERE id = $1
            RETURNING id, original_url, short_code, status, click_count,
                      expires_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.original_url)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.expires_at.is_some())
        .bind(patch.expires_at.flatten())
        .fetch_optional(self.pool.as_ref())
        .await?;

        into_link(row)
    }

    async fn increment_click_count(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE short_links
            SET click_count = click_count + 1,
                updated_at  = NOW()
            WHERE short_code = $1
            RETURNING id, original_url, short_code, status, click_count,
                      expires_at, created_at, updated_at
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        into_link(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_all(&self, status: Option<LinkStatus>) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, status, click_count,
                   expires_at, created_at, updated_at
            FROM short_links
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ShortLink::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
