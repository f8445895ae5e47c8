use crate::core::{AppError, PageLimits, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub paging: PageLimits,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    &env::var("CORS_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                ),
            },
            paging: PageLimits {
                default_size: parse_u32("PAGE_DEFAULT_SIZE", 12)?,
                max_size: parse_u32("PAGE_MAX_SIZE", 100)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        if self.paging.default_size == 0 || self.paging.default_size > self.paging.max_size {
            return Err(AppError::Configuration(
                "PAGE_DEFAULT_SIZE must be between 1 and PAGE_MAX_SIZE".to_string(),
            ));
        }

        if !matches!(self.app.log_format.as_str(), "pretty" | "json") {
            return Err(AppError::Configuration(format!(
                "Unknown LOG_FORMAT '{}', expected pretty or json",
                self.app.log_format
            )));
        }

        Ok(())
    }
}

fn parse_u32(key: &str, default: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
