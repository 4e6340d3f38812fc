//! Configuration for invoice-service.

use service_core::config::Config as CoreConfig;
use service_core::error::AppError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct InvoiceConfig {
    pub service_name: String,
    pub log_level: String,
    pub common: CoreConfig,
    pub database: DatabaseConfig,
}

impl InvoiceConfig {
    /// Load configuration from the environment (and `.env`, if present).
    /// `DATABASE_URL` is the only required key.
    pub fn from_env() -> Result<Self, AppError> {
        let common = CoreConfig::load()?;

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::ConfigError(anyhow::anyhow!("DATABASE_URL must be set")))?;

        Ok(Self {
            service_name: env_or("SERVICE_NAME", "invoice-service"),
            log_level: env_or("LOG_LEVEL", "info"),
            common,
            database: DatabaseConfig {
                url,
                max_connections: env_parse("DB_MAX_CONNECTIONS", 16)?,
                min_connections: env_parse("DB_MIN_CONNECTIONS", 1)?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse(key: &str, default: u32) -> Result<u32, AppError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}
