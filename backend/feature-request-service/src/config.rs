/// Configuration management for Feature Request Service
///
/// Loads configuration from environment variables (and a `.env` file when
/// present).
use anyhow::{anyhow, bail, Context, Result};
use db_pool::env_utils::parse_env_or;
use db_pool::DbConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const SERVICE_NAME: &str = "feature-request-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Store engine settings
    pub store: StoreConfig,
    /// PostgreSQL pool settings; present only for the postgres backend
    pub database: Option<DbConfig>,
    /// CORS configuration
    pub cors: CorsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Upper bound for a single store operation
    pub operation_timeout_ms: u64,
}

impl StoreConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: parse_env_or("APP_ENV", "development".to_string()).map_err(|e| anyhow!(e))?,
            host: parse_env_or("APP_HOST", "0.0.0.0".to_string()).map_err(|e| anyhow!(e))?,
            port: parse_env_or("PORT", 8080).map_err(|e| anyhow!(e))?,
        };

        let store = StoreConfig {
            backend: parse_env_or("STORE_BACKEND", StoreBackend::Postgres)
                .map_err(|e| anyhow!(e))?,
            operation_timeout_ms: parse_env_or("STORE_OPERATION_TIMEOUT_MS", 2000)
                .map_err(|e| anyhow!(e))?,
        };

        let database = match store.backend {
            StoreBackend::Postgres => {
                let mut db = DbConfig::from_env(SERVICE_NAME)
                    .map_err(|e| anyhow!(e))
                    .context("postgres store backend needs database settings")?;
                db.statement_timeout_ms = Some(store.operation_timeout_ms);
                Some(db)
            }
            StoreBackend::Memory => None,
        };

        let cors = CorsConfig {
            allowed_origins: parse_env_or("CORS_ALLOWED_ORIGINS", "*".to_string())
                .map_err(|e| anyhow!(e))?,
        };

        Ok(Config {
            app,
            store,
            database,
            cors,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.app.port == 0 {
            bail!("PORT must be greater than 0");
        }

        if self.store.operation_timeout_ms == 0 {
            bail!("STORE_OPERATION_TIMEOUT_MS must be greater than 0");
        }

        match (self.store.backend, &self.database) {
            (StoreBackend::Postgres, Some(db)) => db.validate().map_err(|e| anyhow!(e))?,
            (StoreBackend::Postgres, None) => bail!("DATABASE_URL is required for the postgres backend"),
            (StoreBackend::Memory, _) => {}
        }

        if self.cors.origins().next().is_none() {
            bail!("CORS_ALLOWED_ORIGINS must list at least one origin");
        }

        Ok(())
    }
}
