//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! The connector part ([`ConnectorConfig`]) is an immutable value handed to every
//! component that talks to the connector; nothing reads the environment after
//! startup.
//!
//! ## Required Variables
//!
//! - `GSC_API_KEY` - Key sent as `X-API-Key` on every connector call
//!
//! ## Optional Variables
//!
//! - `GSC_BASE_URL` - Connector base URL (default: `http://localhost:8021`)
//! - `GSC_TIMEOUT_SECS` - Timeout for data-bearing calls (default: 60)
//! - `GSC_HEALTH_TIMEOUT_SECS` - Timeout for liveness probes (default: 5)
//! - `DASHBOARD_PAGE_CAP` - Max page records aggregated per dashboard (default: 50)
//! - `IMPORT_JOB_HISTORY` - Import jobs kept in memory (default: 500)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::application::services::import_service::DEFAULT_JOB_HISTORY;
use crate::error::ConnectorError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8021";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable connection settings for the connector service.
#[derive(Clone)]
pub struct ConnectorConfig {
    base_url: Url,
    api_key: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl ConnectorConfig {
    /// Validates the base URL and API key; timeouts start at their defaults.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ConnectorError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ConnectorError::validation(format!("invalid connector base URL '{base_url}': {e}"))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConnectorError::validation(format!(
                "connector base URL must be http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConnectorError::validation("API key must not be empty"));
        }
        if !api_key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConnectorError::validation(
                "API key must be printable ASCII without spaces",
            ));
        }

        Ok(Self {
            base_url,
            api_key,
            timeout: DEFAULT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn health_timeout(&self) -> Duration {
        self.health_timeout
    }

    /// Joins an endpoint onto the base URL, tolerating slashes on either side.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Where a human goes to grant the connector OAuth access.
    pub fn auth_link(&self) -> String {
        self.endpoint_url("/auth/url")
    }
}

impl std::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &mask_secret(&self.api_key))
            .field("timeout", &self.timeout)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub connector: ConnectorConfig,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Maximum number of page records pulled into one dashboard.
    pub dashboard_page_cap: u32,
    /// Maximum number of import jobs tracked in memory.
    pub import_job_history: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `GSC_API_KEY` is missing, a numeric variable is
    /// not a number, or the connector settings are malformed.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("GSC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = env::var("GSC_API_KEY").context("GSC_API_KEY must be set")?;

        let timeout = Duration::from_secs(env_number("GSC_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?);
        let health_timeout = Duration::from_secs(env_number(
            "GSC_HEALTH_TIMEOUT_SECS",
            DEFAULT_HEALTH_TIMEOUT.as_secs(),
        )?);

        let connector = ConnectorConfig::new(&base_url, api_key)
            .context("Failed to load connector configuration")?
            .with_timeout(timeout)
            .with_health_timeout(health_timeout);

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let dashboard_page_cap = env_number("DASHBOARD_PAGE_CAP", 50)?;
        let import_job_history = env_number("IMPORT_JOB_HISTORY", DEFAULT_JOB_HISTORY)?;

        Ok(Self {
            connector,
            listen_addr,
            log_level,
            log_format,
            dashboard_page_cap,
            import_job_history,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a connector timeout is zero
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `dashboard_page_cap` is outside `1..=1000`
    /// - `import_job_history` is zero
    pub fn validate(&self) -> Result<()> {
        if self.connector.timeout().is_zero() {
            anyhow::bail!("GSC_TIMEOUT_SECS must be greater than 0");
        }

        if self.connector.health_timeout().is_zero() {
            anyhow::bail!("GSC_HEALTH_TIMEOUT_SECS must be greater than 0");
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

        if !(1..=1000).contains(&self.dashboard_page_cap) {
            anyhow::bail!(
                "DASHBOARD_PAGE_CAP must be between 1 and 1000, got {}",
                self.dashboard_page_cap
            );
        }

        if self.import_job_history == 0 {
            anyhow::bail!("IMPORT_JOB_HISTORY must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Connector: {}", self.connector.base_url());
        tracing::info!("  API key: {}", mask_secret(self.connector.api_key()));
        tracing::info!(
            "  Timeouts: data {}s, health {}s",
            self.connector.timeout().as_secs(),
            self.connector.health_timeout().as_secs()
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Dashboard page cap: {}", self.dashboard_page_cap);
        tracing::info!("  Import job history: {}", self.import_job_history);
    }
}

/// Reads a numeric variable, falling back to `default` when it is unset.
fn env_number<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} must be a non-negative integer, got '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

/// Keeps the first four characters of a secret and hides the rest.
fn mask_secret(secret: &str) -> String {
    if secret.len() <= 4 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}***")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
