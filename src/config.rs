use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ToolError;
use crate::retry::RetryPolicy;
use crate::Result;

/// Process-wide configuration, built once at startup and passed by reference
/// to whatever needs it. There is deliberately no global settings singleton.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub network: NetworkConfig,
    pub retry: RetryConfig,
    #[serde(skip)]
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub root_dir: PathBuf,
    pub max_age_hours: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
}

/// API credentials for the communication/search collaborators. The cache and
/// date utilities never read these; they exist so the host application can
/// hand each client its keys from one explicit place.
#[derive(Debug, Default)]
pub struct Credentials {
    pub rapidapi_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub email_username: Option<String>,
    pub email_password: Option<String>,
    pub unipile_api_key: Option<String>,
    pub unipile_dsn: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            network: NetworkConfig::default(),
            retry: RetryConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: "./media_cache".into(),
            max_age_hours: 24,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_factor: 2.0,
        }
    }
}

impl Config {
    /// Loads from the TOML file named by `CONFIG_PATH` when set, defaults
    /// otherwise. Credentials always come from the environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.credentials = Credentials::from_env();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ToolError::Config(format!("cannot read {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| ToolError::Config(format!("cannot parse {}: {}", path, e)))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            backoff_factor: self.retry.backoff_factor,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.network.fetch_timeout_secs)
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            rapidapi_key: var("RAPIDAPI_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            google_client_id: var("GOOGLE_CLIENT_ID"),
            google_client_secret: var("GOOGLE_CLIENT_SECRET"),
            email_username: var("EMAIL_USERNAME"),
            email_password: var("EMAIL_PASSWORD"),
            unipile_api_key: var("UNIPILE_API_KEY"),
            unipile_dsn: var("UNIPILE_DSN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.root_dir, PathBuf::from("./media_cache"));
        assert_eq!(config.cache.max_age_hours, 24);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            max_age_hours = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.max_age_hours, 6);
        assert_eq!(config.cache.root_dir, PathBuf::from("./media_cache"));
        assert_eq!(config.network.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = Config::default();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
    }
}
