//! Service configuration
//!
//! Settings are layered: an optional `config/auth.{toml,yaml,json}` file,
//! then environment variables prefixed with `AUTH__` using `__` as the
//! nesting separator (e.g. `AUTH__SESSION__SECRET`, `AUTH__DATABASE__URL`).

use anyhow::{Context, Result};
use common::{cache::RedisConfig, database::DatabaseConfig};
use serde::Deserialize;
use std::time::Duration;

/// Minimum length of the cookie signing secret in bytes
pub const MIN_SECRET_LEN: usize = 64;

/// Service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session store
    #[serde(default)]
    pub redis: RedisConfig,

    /// Session cookie
    pub session: SessionConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign session cookies
    pub secret: String,

    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Server-side session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,

    /// Whether the cookie is restricted to HTTPS
    #[serde(default)]
    pub secure: bool,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("secure", &self.secure)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_cookie_name() -> String {
    "session".into()
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

fn default_log_level() -> String {
    "info".into()
}

impl Settings {
    /// Load settings from `config/auth.*` and `AUTH__*` environment variables
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/auth").required(false));

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix("AUTH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.session.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "session.secret must be at least {} bytes long",
                MIN_SECRET_LEN
            );
        }

        if self.session.cookie_name.is_empty() {
            anyhow::bail!("session.cookie_name must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use serial_test::serial;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn from_toml(toml: &str) -> Result<Settings> {
        Settings::from_builder(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    #[serial]
    fn test_defaults_with_secret_only() {
        let settings = from_toml(&format!("[session]\nsecret = \"{}\"\n", SECRET)).unwrap();

        assert_eq!(settings.server.listen_addr, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.collection, "users");
        assert_eq!(settings.redis.url, "redis://localhost:6379");
        assert_eq!(settings.session.cookie_name, "session");
        assert_eq!(settings.session.ttl(), Duration::from_secs(86400));
        assert!(!settings.session.secure);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_rejected() {
        assert!(from_toml("[server]\nport = 9000\n").is_err());
    }

    #[test]
    #[serial]
    fn test_short_secret_is_rejected() {
        let err = from_toml("[session]\nsecret = \"too-short\"\n").unwrap_err();
        assert!(err.to_string().contains("at least 64 bytes"));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        unsafe {
            std::env::set_var("AUTH__SERVER__PORT", "9090");
            std::env::set_var("AUTH__DATABASE__URL", "postgresql://test:test@db/test");
            std::env::set_var("AUTH__SESSION__SECRET", SECRET);
        }

        let settings = from_toml("[server]\nport = 9000\n\n[session]\nsecret = \"short\"\n");

        unsafe {
            std::env::remove_var("AUTH__SERVER__PORT");
            std::env::remove_var("AUTH__DATABASE__URL");
            std::env::remove_var("AUTH__SESSION__SECRET");
        }

        let settings = settings.unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.database.url, "postgresql://test:test@db/test");
        assert_eq!(settings.session.secret, SECRET);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let session = SessionConfig {
            secret: SECRET.to_string(),
            cookie_name: default_cookie_name(),
            ttl_seconds: default_session_ttl(),
            secure: false,
        };

        let rendered = format!("{:?}", session);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
