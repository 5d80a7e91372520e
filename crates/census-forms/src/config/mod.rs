use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::forms::engine::ErrorMode;
use crate::forms::validators::{MovedMemberPolicy, DEFAULT_HOH_MINIMUM_AGE};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            validation: ValidationConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Rule-evaluation policy shared by every form validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub error_mode: ErrorMode,
    pub moved_member_policy: MovedMemberPolicy,
    pub hoh_minimum_age: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            moved_member_policy: MovedMemberPolicy::default(),
            hoh_minimum_age: DEFAULT_HOH_MINIMUM_AGE,
        }
    }
}

impl ValidationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("APP_VALIDATION_MODE") {
            config.error_mode =
                ErrorMode::parse(&raw).ok_or(ConfigError::InvalidErrorMode { value: raw })?;
        }

        if let Ok(raw) = env::var("APP_MOVED_MEMBER_POLICY") {
            config.moved_member_policy = MovedMemberPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidMovedMemberPolicy { value: raw })?;
        }

        if let Ok(raw) = env::var("APP_HOH_MINIMUM_AGE") {
            config.hoh_minimum_age = raw
                .trim()
                .parse::<u8>()
                .map(i64::from)
                .map_err(|_| ConfigError::InvalidMinimumAge)?;
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidErrorMode { value: String },
    InvalidMovedMemberPolicy { value: String },
    InvalidMinimumAge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidErrorMode { value } => write!(
                f,
                "APP_VALIDATION_MODE must be fail_fast or collect_all (got '{value}')"
            ),
            ConfigError::InvalidMovedMemberPolicy { value } => write!(
                f,
                "APP_MOVED_MEMBER_POLICY must be guard_only, presence_gated or cascade (got '{value}')"
            ),
            ConfigError::InvalidMinimumAge => {
                write!(f, "APP_HOH_MINIMUM_AGE must be a whole number of years")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_VALIDATION_MODE");
        env::remove_var("APP_MOVED_MEMBER_POLICY");
        env::remove_var("APP_HOH_MINIMUM_AGE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(config.validation.hoh_minimum_age, 18);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_validation_policy_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_VALIDATION_MODE", "collect_all");
        env::set_var("APP_MOVED_MEMBER_POLICY", "presence-gated");
        env::set_var("APP_HOH_MINIMUM_AGE", "21");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.validation.error_mode, ErrorMode::CollectAll);
        assert_eq!(
            config.validation.moved_member_policy,
            MovedMemberPolicy::PresenceGated
        );
        assert_eq!(config.validation.hoh_minimum_age, 21);
        reset_env();
    }

    #[test]
    fn rejects_unknown_moved_member_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MOVED_MEMBER_POLICY", "strictest");
        let error = AppConfig::load().expect_err("policy is rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidMovedMemberPolicy { ref value } if value == "strictest"
        ));
        reset_env();
    }
}
