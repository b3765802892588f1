//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `TODO__*` environment variables.

use std::path::Path;

use bb8_redis::redis;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8089,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    pub pool_size: u32,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            pool_size: 10,
        }
    }
}

impl RedisSettings {
    pub fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: redis::RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Redis key holding the todo hash.
    pub namespace: String,
    /// First id handed out when a client does not supply one.
    pub initial_id: u64,
    /// Write the sample todo on startup.
    pub seed_sample: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            namespace: "VERT_TODO".to_string(),
            initial_id: 1,
            seed_sample: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub redis: RedisSettings,
    pub store: StoreSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from `path` (or `todo.toml` if present) and the
    /// environment, on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = Config::try_from(&Settings::default())?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("todo").required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("TODO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.port == 0 {
            return Err(SettingsError::Invalid {
                key: "server.port",
                message: "must be non-zero".to_string(),
            });
        }
        if self.store.namespace.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "store.namespace",
                message: "must not be empty".to_string(),
            });
        }
        if self.store.initial_id == 0 || self.store.initial_id > crate::ids::MAX_ID {
            return Err(SettingsError::Invalid {
                key: "store.initial_id",
                message: format!("must be between 1 and {}", crate::ids::MAX_ID),
            });
        }
        if self.redis.pool_size == 0 {
            return Err(SettingsError::Invalid {
                key: "redis.pool_size",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8089");
        assert_eq!(settings.redis.port, 6379);
        assert_eq!(settings.store.namespace, "VERT_TODO");
        assert_eq!(settings.store.backend, StoreBackend::Redis);
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let mut settings = Settings::default();
        settings.store.namespace = "  ".to_string();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "store.namespace", .. }));
    }

    #[test]
    fn initial_id_must_leave_room_for_the_counter() {
        let mut settings = Settings::default();
        settings.store.initial_id = 0;
        assert!(settings.validate().is_err());
        settings.store.initial_id = u64::MAX;
        assert!(settings.validate().is_err());
        settings.store.initial_id = crate::ids::MAX_ID;
        settings.validate().unwrap();
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("todo-settings-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[store]\nbackend = \"memory\"\nseed_sample = false\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert!(!settings.store.seed_sample);
        assert_eq!(settings.store.namespace, "VERT_TODO");
    }

    #[test]
    fn connection_info_carries_password_and_db() {
        let redis = RedisSettings {
            password: Some("secret".to_string()),
            db: 2,
            ..RedisSettings::default()
        };
        let info = redis.connection_info();
        assert_eq!(info.redis.db, 2);
        assert_eq!(info.redis.password.as_deref(), Some("secret"));
    }
}
