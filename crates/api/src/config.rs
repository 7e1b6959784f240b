//! Process configuration from the environment (and an optional `.env`).

use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use bloodbank_infra::db::{DEFAULT_DATABASE_URL, DatabaseConfig};
use bloodbank_observability::{LogFormat, TelemetryConfig, UnknownLogFormat};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        let url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidMaxConnections(raw)),
            },
            Err(_) => 1,
        };

        let level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse::<LogFormat>()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            telemetry: TelemetryConfig { level, format },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq)]
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
            .map_err(|source| ConfigError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),

    #[error("APP_HOST '{host}' must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("DATABASE_MAX_CONNECTIONS must be a positive integer, got '{0}'")]
    InvalidMaxConnections(String),

    #[error(transparent)]
    InvalidLogFormat(#[from] UnknownLogFormat),
}
