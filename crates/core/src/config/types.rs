use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Development-mode signing secret. Never use in production; `main` warns
/// loudly when it is still in effect.
pub const DEV_SECRET: &str = "dev-secret-key";

/// Root configuration
///
/// Every section has a development-mode default, so the service starts
/// with no config file at all.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("faregate.db")
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret")]
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
        }
    }
}

fn default_secret() -> String {
    DEV_SECRET.to_string()
}

/// Notification queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Redis connection URL.
    #[serde(default = "default_queue_url")]
    pub url: String,
    /// Name of the list both producers and the consumer use.
    #[serde(default = "default_queue_key")]
    pub key: String,
    /// Blocking-pop timeout; bounds how long shutdown can go unobserved.
    #[serde(default = "default_pop_timeout")]
    pub pop_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: default_queue_url(),
            key: default_queue_key(),
            pop_timeout_secs: default_pop_timeout(),
        }
    }
}

fn default_queue_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

fn default_queue_key() -> String {
    "notification_queue".to_string()
}

fn default_pop_timeout() -> u64 {
    5
}

/// Settlement gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Fraction of payments the simulated gateway approves.
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            success_rate: default_success_rate(),
        }
    }
}

fn default_success_rate() -> f64 {
    0.8
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: SanitizedAuthConfig,
    pub queue: QueueConfig,
    pub gateway: GatewayConfig,
}

/// Sanitized auth config (signing secret hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    /// False while the development default is still in effect.
    pub secret_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            auth: SanitizedAuthConfig {
                secret_configured: config.auth.secret != DEV_SECRET,
            },
            queue: config.queue.clone(),
            gateway: config.gateway.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "faregate.db");
        assert_eq!(config.auth.secret, DEV_SECRET);
        assert_eq!(config.queue.url, "redis://127.0.0.1:6379/0");
        assert_eq!(config.queue.key, "notification_queue");
        assert_eq!(config.queue.pop_timeout_secs, 5);
        assert_eq!(config.gateway.success_rate, 0.8);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[auth]
secret = "prod-signing-secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.auth.secret, "prod-signing-secret");
        // Untouched sections keep their defaults.
        assert_eq!(config.queue.key, "notification_queue");
    }

    #[test]
    fn test_deserialize_queue_section() {
        let toml = r#"
[queue]
url = "redis://queue-host:6379/1"
key = "faregate_events"
pop_timeout_secs = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.queue.url, "redis://queue-host:6379/1");
        assert_eq!(config.queue.key, "faregate_events");
        assert_eq!(config.queue.pop_timeout_secs, 2);
    }

    #[test]
    fn test_sanitized_config_hides_secret() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        assert!(!sanitized.auth.secret_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains(DEV_SECRET));
    }

    #[test]
    fn test_sanitized_config_reports_real_secret() {
        let config = Config {
            auth: AuthConfig {
                secret: "prod-signing-secret".to_string(),
            },
            ..Default::default()
        };
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.auth.secret_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("prod-signing-secret"));
    }
}
