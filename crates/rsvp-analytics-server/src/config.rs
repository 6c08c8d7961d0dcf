//! Server configuration management

use std::path::PathBuf;

use crate::error::{ApiError, Result};
use rsvp_analytics::{DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Velocity lookback used when a request does not specify one
    pub default_lookback_days: u32,

    /// Largest lookback a request may ask for
    pub max_lookback_days: u32,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// JSON file of event fixtures loaded into the in-memory source
    pub seed_file: Option<PathBuf>,

    /// Whether to enable debug logging
    pub debug: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::config("Invalid PORT value"))?,
            default_lookback_days: std::env::var("DEFAULT_LOOKBACK_DAYS")
                .unwrap_or_else(|_| DEFAULT_LOOKBACK_DAYS.to_string())
                .parse()
                .map_err(|_| ApiError::config("Invalid DEFAULT_LOOKBACK_DAYS value"))?,
            max_lookback_days: std::env::var("MAX_LOOKBACK_DAYS")
                .unwrap_or_else(|_| "365".to_string())
                .parse()
                .map_err(|_| ApiError::config("Invalid MAX_LOOKBACK_DAYS value"))?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            seed_file: std::env::var("SEED_FILE").ok().map(PathBuf::from),
            debug: std::env::var("DEBUG")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the lookback limits against each other and the engine's cap
    pub fn validate(&self) -> Result<()> {
        if self.max_lookback_days == 0 || self.max_lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ApiError::Config(format!(
                "MAX_LOOKBACK_DAYS must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if self.default_lookback_days == 0 || self.default_lookback_days > self.max_lookback_days
        {
            return Err(ApiError::Config(format!(
                "DEFAULT_LOOKBACK_DAYS must be between 1 and {}",
                self.max_lookback_days
            )));
        }
        Ok(())
    }

    /// Lookback for a request, falling back to the configured default
    pub fn lookback_days(&self, requested: Option<u32>) -> Result<u32> {
        match requested {
            None => Ok(self.default_lookback_days),
            Some(days) if days == 0 || days > self.max_lookback_days => {
                Err(ApiError::Validation(format!(
                    "lookbackDays must be between 1 and {}",
                    self.max_lookback_days
                )))
            }
            Some(days) => Ok(days),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_lookback_days: 365,
            cors_origins: vec!["*".to_string()],
            seed_file: None,
            debug: false,
        }
    }
}
