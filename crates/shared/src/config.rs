//! Application configuration management.
//!
//! Configuration is loaded once and handed to each component at
//! construction; no component reads the environment on its own.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Tax-authority gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Inbound webhook verification configuration.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Background work-queue configuration.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Role-claim configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Tax-authority gateway configuration.
///
/// When neither `base_url` nor `sandbox_url` is set the gateway client runs
/// against the deterministic local simulator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Production endpoint base URL.
    pub base_url: Option<String>,
    /// Sandbox endpoint base URL, selected per call by the caller.
    pub sandbox_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of submission attempts.
    #[serde(default = "default_gateway_retries")]
    pub retries: u32,
    /// Exponential backoff factor between attempts.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: Decimal,
    /// Upper bound on a single backoff delay, in seconds.
    #[serde(default = "default_backoff_ceiling")]
    pub backoff_ceiling_secs: u64,
    /// Path to a hex-encoded Ed25519 signing seed (32 bytes).
    pub signing_key_path: Option<PathBuf>,
    /// Path to a hex-encoded Ed25519 verifying key for response signatures.
    pub verify_key_path: Option<PathBuf>,
}

fn default_gateway_timeout() -> u64 {
    10
}

fn default_gateway_retries() -> u32 {
    3
}

fn default_backoff_factor() -> Decimal {
    Decimal::new(15, 1) // 1.5
}

fn default_backoff_ceiling() -> u64 {
    60
}

/// Inbound webhook verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for the callback HMAC.
    #[serde(default = "default_webhook_secret")]
    pub signing_secret: String,
    /// Maximum absolute skew between a callback timestamp and now, in seconds.
    #[serde(default = "default_timestamp_window")]
    pub timestamp_window_secs: i64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            signing_secret: default_webhook_secret(),
            timestamp_window_secs: default_timestamp_window(),
        }
    }
}

fn default_webhook_secret() -> String {
    "dev-secret-key".to_string()
}

fn default_timestamp_window() -> i64 {
    300
}

/// Background work-queue configuration.
///
/// When `redis_url` is unset, gateway submissions run inline and the caller
/// blocks for the full retry duration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueConfig {
    /// Redis connection URL for the queue transport, if any.
    pub redis_url: Option<String>,
    /// Queue name for gateway submission jobs.
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
}

fn default_queue_name() -> String {
    "gsp".to_string()
}

/// Role-claim configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to verify inbound bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
        }
    }
}

fn default_jwt_secret() -> String {
    "dev-secret".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GSTBOOKS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_gateway_defaults() {
        let gw: GatewayConfig = serde_json::from_str("{}").unwrap();
        assert!(gw.base_url.is_none());
        assert!(gw.sandbox_url.is_none());
        assert_eq!(gw.timeout_secs, 10);
        assert_eq!(gw.retries, 3);
        assert_eq!(gw.backoff_factor, dec!(1.5));
        assert_eq!(gw.backoff_ceiling_secs, 60);
    }

    #[test]
    fn test_webhook_defaults() {
        let wh = WebhookConfig::default();
        assert_eq!(wh.signing_secret, "dev-secret-key");
        assert_eq!(wh.timestamp_window_secs, 300);
    }

    #[test]
    fn test_queue_defaults() {
        let q: QueueConfig = serde_json::from_str("{}").unwrap();
        assert!(q.redis_url.is_none());
        assert_eq!(q.queue_name, "gsp");
    }

    #[test]
    fn test_full_config_from_json() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{
                "database": {"url": "postgres://localhost/gstbooks"},
                "gateway": {"base_url": "https://gsp.example.com", "retries": 5},
                "webhook": {"signing_secret": "s3cret"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.database.url, "postgres://localhost/gstbooks");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.gateway.retries, 5);
        assert_eq!(cfg.webhook.signing_secret, "s3cret");
        assert_eq!(cfg.queue.queue_name, "gsp");
    }
}
