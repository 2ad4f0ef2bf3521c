//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `REPORTS_CONFIG`) and are
//! then overridden by environment variables:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `DATABASE_URL` | `database.url` |
//! | `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` | `database.*` |
//! | `LISTEN_ADDR` | `server.listen_addr` |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Environment variable holding the YAML configuration path
pub const CONFIG_PATH_ENV: &str = "REPORTS_CONFIG";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    #[validate(length(min = 1))]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Connection pool settings
///
/// Either `url` or the `host`/`user`/`name` triple must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: default_port(),
            user: None,
            password: None,
            name: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl DatabaseConfig {
    /// Connection URL, built from the parts when `url` is not set
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        let host = required(&self.host, "host")?;
        let user = required(&self.user, "user")?;
        let name = required(&self.name, "name")?;
        let credentials = match self.password.as_deref() {
            Some(password) if !password.is_empty() => format!(
                "{}:{}",
                urlencoding::encode(user),
                urlencoding::encode(password)
            ),
            _ => urlencoding::encode(user).into_owned(),
        };
        Ok(format!(
            "postgres://{}@{}:{}/{}",
            credentials, host, self.port, name
        ))
    }

    /// Target description for logs (never includes credentials)
    pub fn display_target(&self) -> String {
        match (&self.url, &self.host) {
            (Some(url), _) if !url.is_empty() => match url.rsplit_once('@') {
                Some((_, target)) => target.to_string(),
                None => "configured url".to_string(),
            },
            (_, Some(host)) => format!(
                "{}:{}/{}",
                host,
                self.port,
                self.name.as_deref().unwrap_or_default()
            ),
            _ => "unconfigured database".to_string(),
        }
    }
}

fn required<'a>(value: &'a Option<String>, setting: &str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingDatabaseSetting {
            setting: setting.to_string(),
        })
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = Some(host);
        }
        if let Some(port) = lookup("DB_PORT") {
            match port.parse() {
                Ok(port) => self.database.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid DB_PORT"),
            }
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = Some(name);
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        self
    }

    /// Check bounds and that the database is addressable
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;
        self.database.connection_url().map(|_| ())
    }

    /// Load from `REPORTS_CONFIG` (if set) and the environment, then check
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides(|key| std::env::var(key).ok());
        config.check()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_url_from_parts_encodes_credentials() {
        let db = DatabaseConfig {
            host: Some("db".to_string()),
            user: Some("report user".to_string()),
            password: Some("p@ss:word".to_string()),
            name: Some("tienda".to_string()),
            ..DatabaseConfig::default()
        };
        assert_eq!(
            db.connection_url().unwrap(),
            "postgres://report%20user:p%40ss%3Aword@db:5432/tienda"
        );
        assert_eq!(db.display_target(), "db:5432/tienda");
    }

    #[test]
    fn test_missing_parts_is_an_error() {
        let db = DatabaseConfig {
            host: Some("db".to_string()),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            db.connection_url(),
            Err(ConfigError::MissingDatabaseSetting { setting }) if setting == "user"
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DB_HOST", "pg"),
            ("DB_PORT", "6543"),
            ("DB_USER", "lector"),
            ("DB_NAME", "ventas"),
            ("LISTEN_ADDR", "127.0.0.1:8080"),
        ]);
        let config = DashboardConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
        assert_eq!(
            config.database.connection_url().unwrap(),
            "postgres://lector@pg:6543/ventas"
        );
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_yaml_and_bounds() {
        let yaml = r#"
database:
  url: postgres://u:p@localhost/db
  max_connections: 500
"#;
        let config = DashboardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert!(matches!(config.check(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_yaml_parse_error() {
        assert!(matches!(
            DashboardConfig::from_yaml_str("database: [unclosed"),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
