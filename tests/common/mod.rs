#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

use likr::application::services::{AnalyticsService, AuthService, RedirectService, UrlService};
use likr::domain::qr_code::QrCodeHost;
use likr::domain::repositories::UrlRepository;
use likr::domain::visit_event::VisitEvent;
use likr::domain::visit_worker::{VisitCompletion, VisitDispatcher, VisitWorker};
use likr::infrastructure::persistence::{InMemoryUrlRepository, InMemoryVisitRepository};
use likr::infrastructure::qr_code::EndpointQrCodeHost;
use likr::routes::build_router;
use likr::state::AppState;
use likr::utils::code_generator::{CodeGenerator, SlugCounter};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://lk.test";
pub const QR_ENDPOINT: &str = "https://qr.test/render?size=256x256";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

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
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub struct TestOptions {
    pub queue_capacity: usize,
    pub start_worker: bool,
    pub behind_proxy: bool,
    pub qr_codes: Option<Arc<dyn QrCodeHost>>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            start_worker: true,
            behind_proxy: false,
            qr_codes: None,
        }
    }
}

/// Full router over the in-memory store, with handles to inspect it.
pub struct TestApp {
    pub server: TestServer,
    pub urls: Arc<InMemoryUrlRepository>,
    pub visits: Arc<InMemoryVisitRepository>,
    pub auth: Arc<AuthService>,
    pub completions: mpsc::UnboundedReceiver<VisitCompletion>,
    /// Receiving end of the visit queue when no worker was started.
    pub visit_rx: Option<mpsc::Receiver<VisitEvent>>,
}

impl TestApp {
    pub fn token(&self, owner: &str) -> String {
        format!("Bearer {}", self.auth.issue(owner).unwrap())
    }

    /// Waits for `n` visits to be processed by the worker.
    pub async fn await_visits(&mut self, n: usize) -> Vec<VisitCompletion> {
        let mut done = Vec::with_capacity(n);
        for _ in 0..n {
            let completion = tokio::time::timeout(Duration::from_secs(5), self.completions.recv())
                .await
                .expect("visit not processed in time")
                .expect("visit worker stopped");
            done.push(completion);
        }
        done
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default())
}

pub fn spawn_app_with(options: TestOptions) -> TestApp {
    let urls = Arc::new(InMemoryUrlRepository::new());
    let visits = Arc::new(InMemoryVisitRepository::new());
    let auth = Arc::new(AuthService::new(TEST_SECRET.to_string()));

    let qr_codes = options
        .qr_codes
        .unwrap_or_else(|| Arc::new(EndpointQrCodeHost::new(QR_ENDPOINT).unwrap()) as Arc<dyn QrCodeHost>);

    let url_service = Arc::new(UrlService::new(
        urls.clone() as Arc<dyn UrlRepository>,
        qr_codes,
        CodeGenerator::new(Arc::new(SlugCounter::new())),
        BASE_URL,
    ));
    let redirect_service = Arc::new(RedirectService::new(
        urls.clone() as Arc<dyn UrlRepository>,
    ));

    let (dispatcher, rx) = VisitDispatcher::channel(options.queue_capacity);
    let (completion_tx, completions) = mpsc::unbounded_channel();

    let visit_rx = if options.start_worker {
        let analytics = Arc::new(AnalyticsService::new(urls.clone(), visits.clone()));
        tokio::spawn(
            VisitWorker::new(analytics, 4)
                .with_completion_signal(completion_tx)
                .run(rx),
        );
        None
    } else {
        Some(rx)
    };

    let state = AppState::new(
        url_service,
        redirect_service,
        auth.clone(),
        dispatcher,
        options.behind_proxy,
    );

    let app = build_router(state).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        urls,
        visits,
        auth,
        completions,
        visit_rx,
    }
}

/// Creates one short URL through the API and returns the result item.
pub async fn create_url(app: &TestApp, owner: &str, body: serde_json::Value) -> serde_json::Value {
    let response = app
        .server
        .post("/v1/api/urls")
        .add_header("Authorization", app.token(owner))
        .json(&serde_json::json!({ "urls": [body] }))
        .await;

    let json = response.json::<serde_json::Value>();
    json["items"][0].clone()
}
