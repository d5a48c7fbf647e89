//! Process-local link repository.
//!
//! Mirrors the guarantees of the PostgreSQL store: a unique index on `short_code`,
//! atomic click increments and newest-first listing. All state sits behind one
//! `RwLock`, so each operation is applied as a single step.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{LinkStatus, NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    links: HashMap<i64, ShortLink>,
    /// Unique index: short code -> id.
    codes: HashMap<String, i64>,
}

/// In-memory repository used for development and HTTP tests.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    tables: RwLock<Tables>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_code(
        &self,
        code: &str,
        status: Option<LinkStatus>,
    ) -> Result<Option<ShortLink>, AppError> {
        let tables = self.tables.read().await;

        Ok(tables
            .codes
            .get(code)
            .and_then(|id| tables.links.get(id))
            .filter(|link| status.is_none_or(|s| link.status == s))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self.tables.read().await.links.get(&id).cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().await.codes.contains_key(code))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut tables = self.tables.write().await;

        if tables.codes.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.short_code }),
            ));
        }

        tables.next_id += 1;
        let id = tables.next_id;
        let now = Utc::now();

        let link = ShortLink {
            id,
            original_url: new_link.original_url,
            short_code: new_link.short_code,
            status: new_link.status,
            click_count: 0,
            expires_at: new_link.expires_at,
            created_at: now,
            updated_at: now,
        };

        tables.codes.insert(link.short_code.clone(), id);
        tables.links.insert(id, link.clone());

        Ok(link)
    }

    async fn update_by_id(
        &self,
        id: i64,
        patch: ShortLinkPatch,
    ) -> Result<Option<ShortLink>, AppError> {
        let mut tables = self.tables.write().await;

        let Some(link) = tables.links.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(url) = patch.original_url {
            link.original_url = url;
        }
        if let Some(status) = patch.status {
            link.status = status;
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }
        link.updated_at = Utc::now();

        Ok(Some(link.clone()))
    }

    async fn increment_click_count(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables.codes.get(code).copied() else {
            return Ok(None);
        };

        Ok(tables.links.get_mut(&id).map(|link| {
            link.click_count += 1;
            link.updated_at = Utc::now();
            link.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;

        match tables.links.remove(&id) {
            Some(link) => {
                tables.codes.remove(&link.short_code);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_all(&self, status: Option<LinkStatus>) -> Result<Vec<ShortLink>, AppError> {
        let tables = self.tables.read().await;

        let mut links: Vec<ShortLink> = tables
            .links
            .values()
            .filter(|link| status.is_none_or(|s| link.status == s))
            .cloned()
            .collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
