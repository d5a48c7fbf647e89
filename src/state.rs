//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::repositories::LinkRepository;

/// Services and settings shared by all requests.
///
/// Cloning is cheap: every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    /// Public origin used to build `short_url` values, without trailing slash.
    pub base_url: Arc<str>,
    pub app_name: Arc<str>,
}

impl AppState {
    /// Wires the services on top of a record store.
    pub fn new(link_repository: Arc<dyn LinkRepository>, base_url: &str, app_name: &str) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone())),
            redirect_service: Arc::new(RedirectService::new(link_repository.clone())),
            link_repository,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            app_name: Arc::from(app_name),
        }
    }

    /// Public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryLinkRepository;

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let state = AppState::new(
            Arc::new(InMemoryLinkRepository::new()),
            "http://localhost:3000/",
            "tinyurl",
        );

        assert_eq!(state.short_url("abc-1"), "http://localhost:3000/abc-1");
    }
}
