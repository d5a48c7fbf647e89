#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tinyurl::api::routes::api_router;
use tinyurl::domain::entities::{LinkStatus, NewShortLink, ShortLink};
use tinyurl::domain::repositories::LinkRepository;
use tinyurl::infrastructure::persistence::InMemoryLinkRepository;
use tinyurl::state::AppState;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repo.clone(), BASE_URL, "tinyurl-test");
    (state, repo)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();
    (server, repo)
}

pub async fn seed_link(
    repo: &InMemoryLinkRepository,
    code: &str,
    url: &str,
    status: LinkStatus,
    expires_at: Option<DateTime<Utc>>,
) -> ShortLink {
    repo.insert(NewShortLink {
        original_url: url.to_string(),
        short_code: code.to_string(),
        status,
        expires_at,
    })
    .await
    .unwrap()
}

pub async fn seed_active_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    seed_link(repo, code, url, LinkStatus::Active, None).await
}

pub async fn seed_expired_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    seed_link(
        repo,
        code,
        url,
        LinkStatus::Active,
        Some(Utc::now() - Duration::hours(1)),
    )
    .await
}

/// Polls until the stored click count for `code` reaches `expected`.
///
/// Click increments are detached from the request, so tests observe them eventually.
pub async fn wait_for_clicks(repo: &dyn LinkRepository, code: &str, expected: i64) -> i64 {
    let mut count = 0;
    for _ in 0..200 {
        count = repo
            .find_by_code(code, None)
            .await
            .unwrap()
            .map(|l| l.click_count)
            .unwrap_or(0);
        if count >= expected {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    count
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn with_connect_info(router: Router) -> Router {
    router.layer(MockConnectInfoLayer)
}
