//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring, visit worker spawning, and the
//! Axum server lifecycle including graceful shutdown.

use crate::application::services::{AnalyticsService, AuthService, RedirectService, UrlService};
use crate::config::Config;
use crate::domain::qr_code::QrCodeHost;
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::domain::visit_worker::{VisitDispatcher, VisitWorker};
use crate::infrastructure::persistence::{
    InMemoryUrlRepository, InMemoryVisitRepository, PgUrlRepository, PgVisitRepository,
};
use crate::infrastructure::qr_code::EndpointQrCodeHost;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, SlugCounter};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How long shutdown waits for queued visits to be written.
const VISIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Store handles used by the services.
pub struct Stores {
    pub urls: Arc<dyn UrlRepository>,
    pub visits: Arc<dyn VisitRepository>,
}

/// Opens a PostgreSQL pool from the configured pool settings.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Selects the store: PostgreSQL when configured, in-memory otherwise.
///
/// Migrations are applied before the PostgreSQL repositories are handed out.
///
/// # Errors
///
/// Returns an error if the database is configured but unreachable, or if
/// migrations fail.
pub async fn open_stores(config: &Config) -> Result<Stores> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("No database configured, using in-memory store; records are lost on restart");
        return Ok(Stores {
            urls: Arc::new(InMemoryUrlRepository::new()),
            visits: Arc::new(InMemoryVisitRepository::new()),
        });
    };

    let pool = connect_pool(config, database_url).await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations applied");

    let pool = Arc::new(pool);
    let timeout = config.store_timeout();

    Ok(Stores {
        urls: Arc::new(PgUrlRepository::new(pool.clone(), timeout)),
        visits: Arc::new(PgVisitRepository::new(pool, timeout)),
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - URL and visit stores (PostgreSQL or in-memory fallback)
/// - Application services
/// - Background visit worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, finishes
/// in-flight requests, then waits for the visit worker to drain its queue.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - QR code endpoint is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = open_stores(&config).await?;

    let qr_codes: Arc<dyn QrCodeHost> = Arc::new(
        EndpointQrCodeHost::new(&config.qr_code_endpoint)
            .with_context(|| format!("Invalid QR_CODE_ENDPOINT '{}'", config.qr_code_endpoint))?,
    );

    let generator = CodeGenerator::new(Arc::new(SlugCounter::new()));
    let url_service = Arc::new(UrlService::new(
        stores.urls.clone(),
        qr_codes,
        generator,
        config.redirect_base_url.clone(),
    ));
    let redirect_service = Arc::new(RedirectService::new(stores.urls.clone()));
    let auth_service = Arc::new(AuthService::new(config.identity_signing_secret.clone()));
    let analytics = Arc::new(AnalyticsService::new(stores.urls, stores.visits));

    let (visits, visit_rx) = VisitDispatcher::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(
        VisitWorker::new(analytics, config.visit_worker_concurrency).run(visit_rx),
    );
    info!(
        concurrency = config.visit_worker_concurrency,
        "Visit worker started"
    );

    let state = AppState::new(
        url_service,
        redirect_service,
        auth_service,
        visits,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped, draining visit queue");
    match tokio::time::timeout(VISIT_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "Visit worker panicked"),
        Err(_) => warn!("Visit queue not drained before timeout"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
