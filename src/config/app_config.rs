use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Raw storage section; resolved into a backend by `StorageConfig::from_settings`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl AppConfig {
    /// Load from config files and the process environment.
    ///
    /// Any unparsable value is an error; there is no fallback to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(
            config::Environment::with_prefix("APP"),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    fn load_from(
        environment: config::Environment,
        database_url: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;

        if let Some(url) = database_url {
            app_config.storage.database_url = Some(url);
        }

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_env(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();

        config::Environment::with_prefix("APP").source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, "memory");
        assert!(config.storage.database_url.is_none());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 9090)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.max_connections, 10);
    }

    #[test]
    fn test_env_selects_postgres() {
        let config = AppConfig::load_from(
            app_env(&[
                ("APP__STORAGE__BACKEND", "postgres"),
                ("APP__SERVER__PORT", "9000"),
            ]),
            Some("postgres://db/coffee".to_string()),
        )
        .unwrap();

        assert_eq!(config.storage.backend, "postgres");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://db/coffee")
        );
    }

    #[test]
    fn test_malformed_env_value_is_an_error() {
        let result = AppConfig::load_from(
            app_env(&[
                ("APP__STORAGE__BACKEND", "postgres"),
                ("APP__SERVER__PORT", "eighty"),
            ]),
            None,
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }
}
