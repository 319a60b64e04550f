//! Runtime settings, read once from the environment at startup.
//!
//! PostgreSQL is optional. Set either `DATABASE_URL` or the `DB_HOST`,
//! `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` group; with none of
//! `DATABASE_URL`, `DB_HOST`, `DB_USER`, `DB_NAME` present the server keeps
//! records in memory.
//!
//! `IDENTITY_SIGNING_SECRET` is the only mandatory variable. The rest:
//!
//! | Variable | Default |
//! |---|---|
//! | `LISTEN` | `0.0.0.0:5500` |
//! | `RUST_LOG` | `info` |
//! | `LOG_FORMAT` | `text` (`text` or `json`) |
//! | `REDIRECT_BASE_URL` | `http://localhost:5500` |
//! | `QR_CODE_ENDPOINT` | [`DEFAULT_QR_CODE_ENDPOINT`] |
//! | `VISIT_QUEUE_CAPACITY` | `10000` (100..=1000000) |
//! | `VISIT_WORKER_CONCURRENCY` | `4` (1..=256) |
//! | `BEHIND_PROXY` | `false` |
//! | `STORE_TIMEOUT_SECONDS` | `30` |
//! | `DB_MAX_CONNECTIONS` / `DB_CONNECT_TIMEOUT` / `DB_IDLE_TIMEOUT` / `DB_MAX_LIFETIME` | `10` / `30` / `600` / `1800` |

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default QR rendering endpoint; the short URL is appended as `data`.
pub const DEFAULT_QR_CODE_ENDPOINT: &str =
    "https://api.qrserver.com/v1/create-qr-code/?size=256x256";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Prefix joined with the slug to form each short URL.
    pub redirect_base_url: String,
    pub qr_code_endpoint: String,
    /// HMAC key used to issue and verify identity tokens.
    /// Loaded from `IDENTITY_SIGNING_SECRET`. Must be non-empty.
    pub identity_signing_secret: String,
    pub visit_queue_capacity: usize,
    /// Maximum number of visits recorded concurrently by the background worker.
    pub visit_worker_concurrency: usize,
    /// When true, the client IP is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// Upper bound on any single store call, in seconds.
    pub store_timeout_seconds: u64,

    // Pool settings, durations in seconds.
    pub db_max_connections: u32,
    pub db_connect_timeout: u64,
    pub db_idle_timeout: u64,
    pub db_max_lifetime: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing secret is missing or the database
    /// components are only partially configured.
    pub fn from_env() -> Result<Self> {
        let database_url =
            Self::load_database_url().context("Failed to load database configuration")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:5500".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let redirect_base_url = env::var("REDIRECT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5500".to_string());
        let qr_code_endpoint =
            env::var("QR_CODE_ENDPOINT").unwrap_or_else(|_| DEFAULT_QR_CODE_ENDPOINT.to_string());

        let identity_signing_secret = env::var("IDENTITY_SIGNING_SECRET")
            .context("IDENTITY_SIGNING_SECRET must be set")?;

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            listen_addr,
            log_level,
            log_format,
            redirect_base_url,
            qr_code_endpoint,
            identity_signing_secret,
            visit_queue_capacity: env_or("VISIT_QUEUE_CAPACITY", 10_000),
            visit_worker_concurrency: env_or("VISIT_WORKER_CONCURRENCY", 4),
            behind_proxy,
            store_timeout_seconds: env_or("STORE_TIMEOUT_SECONDS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout: env_or("DB_CONNECT_TIMEOUT", 30),
            db_idle_timeout: env_or("DB_IDLE_TIMEOUT", 600),
            db_max_lifetime: env_or("DB_MAX_LIFETIME", 1800),
        })
    }

    /// Resolves the PostgreSQL connection string.
    ///
    /// `DATABASE_URL` wins. Otherwise the `DB_*` group is assembled into a
    /// URL, percent-encoding the credentials. `Ok(None)` means no database.
    fn load_database_url() -> Result<Option<String>> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(Some(url));
        }

        if ["DB_HOST", "DB_USER", "DB_NAME"]
            .iter()
            .all(|key| env::var(key).is_err())
        {
            return Ok(None);
        }

        let required = |key: &str| {
            env::var(key).with_context(|| format!("{key} must be set when DATABASE_URL is not provided"))
        };

        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let user = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;
        let name = required("DB_NAME")?;

        let mut url = Url::parse(&format!("postgres://{host}:{port}"))
            .with_context(|| format!("DB_HOST/DB_PORT do not form a valid address: '{host}:{port}'"))?;
        let no_credentials = || anyhow::anyhow!("Host '{host}' does not accept credentials");
        url.set_username(&user).map_err(|()| no_credentials())?;
        url.set_password(Some(&password)).map_err(|()| no_credentials())?;
        url.set_path(&format!("/{name}"));

        Ok(Some(url.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `visit_queue_capacity` is outside 100..=1000000
    /// - `visit_worker_concurrency` is outside 1..=256
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr`, `database_url`, `redirect_base_url` or `qr_code_endpoint` is malformed
    /// - the signing secret is empty or any timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.visit_queue_capacity < 100 {
            anyhow::bail!(
                "VISIT_QUEUE_CAPACITY must be at least 100, got {}",
                self.visit_queue_capacity
            );
        }

        if self.visit_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "VISIT_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.visit_queue_capacity
            );
        }

        if self.visit_worker_concurrency == 0 || self.visit_worker_concurrency > 256 {
            anyhow::bail!(
                "VISIT_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.visit_worker_concurrency
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref database_url) = self.database_url
            && !database_url.starts_with("postgres://")
            && !database_url.starts_with("postgresql://")
        {
            anyhow::bail!(
                "DATABASE_URL must start with 'postgres://' or 'postgresql://', got '{}'",
                mask_connection_string(database_url)
            );
        }

        let base = Url::parse(&self.redirect_base_url).with_context(|| {
            format!("REDIRECT_BASE_URL is not a valid URL: '{}'", self.redirect_base_url)
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!(
                "REDIRECT_BASE_URL must use http or https, got '{}'",
                self.redirect_base_url
            );
        }

        let qr = Url::parse(&self.qr_code_endpoint).with_context(|| {
            format!("QR_CODE_ENDPOINT is not a valid URL: '{}'", self.qr_code_endpoint)
        })?;
        if !matches!(qr.scheme(), "http" | "https") {
            anyhow::bail!(
                "QR_CODE_ENDPOINT must use http or https, got '{}'",
                self.qr_code_endpoint
            );
        }

        if self.identity_signing_secret.is_empty() {
            anyhow::bail!("IDENTITY_SIGNING_SECRET must not be empty");
        }

        if self.store_timeout_seconds == 0 {
            anyhow::bail!("STORE_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Returns whether records are kept in PostgreSQL.
    pub fn is_database_enabled(&self) -> bool {
        self.database_url.is_some()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }

    /// Logs the effective settings with the database password masked.
    pub fn print_summary(&self) {
        tracing::info!("likr settings:");
        tracing::info!("  Listen: {}", self.listen_addr);

        if let Some(ref database_url) = self.database_url {
            tracing::info!("  Database: {}", mask_connection_string(database_url));
        } else {
            tracing::info!("  Database: disabled (in-memory store)");
        }

        tracing::info!("  Redirect base URL: {}", self.redirect_base_url);
        tracing::info!("  QR code endpoint: {}", self.qr_code_endpoint);
        tracing::info!("  Logging: {} ({})", self.log_level, self.log_format);
        tracing::info!("  Visit queue capacity: {}", self.visit_queue_capacity);
        tracing::info!("  Visit worker concurrency: {}", self.visit_worker_concurrency);
        tracing::info!("  Store timeout: {}s", self.store_timeout_seconds);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
    }
}

/// Replaces the password of a connection string with `***` for logging.
///
/// Strings that do not parse as URLs or carry no password come back as is.
pub fn mask_connection_string(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_err() {
                return raw.to_string();
            }
            url.to_string()
        }
        _ => raw.to_string(),
    }
}

/// [`Config::from_env`] followed by [`Config::validate`].
///
/// `.env` must already be applied by the caller.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
