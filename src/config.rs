use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    10
}
fn default_max_body_bytes() -> usize {
    256 * 1024
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://kyureno.dev".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/folio.db")
}
fn default_pool_size() -> usize {
    8
}

/// Which persistence strategy backs the content store.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    #[default]
    Sqlite,
    Document,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default)]
    pub backend: ContentBackend,
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: ContentBackend::default(),
            document_path: default_document_path(),
        }
    }
}

fn default_document_path() -> PathBuf {
    PathBuf::from("data/content.json")
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Shared secret expected in the `X-Admin-Password` header.
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// TTL of the cached analytics report. 0 disables caching.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_field_bytes")]
    pub max_field_bytes: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            max_field_bytes: default_max_field_bytes(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    5
}
fn default_max_field_bytes() -> usize {
    512
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_per_second")]
    pub per_second: u64,
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: default_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

fn default_per_second() -> u64 {
    5
}
fn default_burst_size() -> u32 {
    30
}

impl AppConfig {
    /// Validate configuration before the server starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.admin_password.is_empty() {
            return Err("auth.admin_password must be set. \
                 Set it in config.toml or via FOLIO__AUTH__ADMIN_PASSWORD env var."
                .to_string());
        }
        if self.database.pool_size == 0 {
            return Err("database.pool_size must be at least 1".to_string());
        }
        if self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0 {
            return Err(
                "rate_limit.per_second and rate_limit.burst_size must be positive".to_string(),
            );
        }
        Ok(())
    }

    pub fn load(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        let path = config_path.unwrap_or("config.toml");
        builder = builder.add_source(File::with_name(path).required(false));

        // Overlay with environment variables (FOLIO__SERVER__PORT=3001, etc.)
        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            content: ContentConfig::default(),
            auth: AuthConfig {
                admin_password: "hunter2".to_string(),
            },
            analytics: AnalyticsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults_with_password() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_password() {
        let mut cfg = base();
        cfg.auth.admin_password.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("admin_password"));
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut cfg = base();
        cfg.database.pool_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_backend_defaults_to_sqlite() {
        assert_eq!(ContentConfig::default().backend, ContentBackend::Sqlite);
    }
}
