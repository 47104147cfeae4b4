use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where the application is being hosted. Adapters set this before the app is
/// built; handlers only ever read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostEnvironment {
    #[default]
    Local,
    Serverless,
}

impl HostEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEnvironment::Local => "local",
            HostEnvironment::Serverless => "serverless",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("validation error: {0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppSection {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub default_mall: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoggingConfig {
    pub level: log::LevelFilter,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(custom(function = "validate_listen_addr"))]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8787".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SpinLogsConfig {
    /// Window applied when a query names no dates at all.
    #[validate(range(min = 1, max = 3650))]
    pub default_days: u32,
    #[validate(range(min = 1))]
    pub default_limit: usize,
    #[validate(range(min = 1))]
    pub max_limit: usize,
}

impl Default for SpinLogsConfig {
    fn default() -> Self {
        Self {
            default_days: 30,
            default_limit: 50,
            max_limit: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub app: AppSection,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub spin_logs: SpinLogsConfig,
    #[serde(default)]
    pub environment: HostEnvironment,
}

fn validate_listen_addr(addr: &str) -> Result<(), ValidationError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("listen_addr"))
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(s)?;
        cfg.check()?;
        Ok(cfg)
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.app.default_mall.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "app.default_mall must not be blank".to_string(),
            ));
        }
        if self.spin_logs.default_limit > self.spin_logs.max_limit {
            return Err(ConfigError::Invalid(format!(
                "spin_logs.default_limit ({}) exceeds spin_logs.max_limit ({})",
                self.spin_logs.default_limit, self.spin_logs.max_limit
            )));
        }
        Ok(())
    }

    /// Apply `WHEELEAT_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("WHEELEAT_LOG_LEVEL") {
            self.logging.level = level.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("WHEELEAT_LOG_LEVEL: unknown level {:?}", level))
            })?;
        }
        if let Some(mall) = lookup("WHEELEAT_DEFAULT_MALL") {
            self.app.default_mall = mall.trim().to_string();
        }
        if let Some(addr) = lookup("WHEELEAT_LISTEN_ADDR") {
            self.server.listen_addr = addr.trim().to_string();
        }
        self.check()
    }

    pub fn with_environment(mut self, environment: HostEnvironment) -> Self {
        self.environment = environment;
        self
    }
}
