//! Application configuration loaded from environment variables.
//!
//! Every variable has a development default, so a bare `cargo run` starts a
//! working server; production deployments override through the environment.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Service name reported by the about endpoint
    pub service_name: String,
    /// Slogan reported by the about endpoint
    pub slogan: String,
    /// Contact line reported by the about endpoint
    pub contacts: String,
    /// Optional roster file loaded at startup
    pub roster_path: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            service_name: "Stride Tracker".to_string(),
            slogan: "Run. Collect. Achieve.".to_string(),
            contacts: "support@stride-tracker.example".to_string(),
            roster_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "Stride Tracker".to_string()),
            slogan: env::var("SLOGAN").unwrap_or_else(|_| "Run. Collect. Achieve.".to_string()),
            contacts: env::var("CONTACTS")
                .unwrap_or_else(|_| "support@stride-tracker.example".to_string()),
            roster_path: env::var("ROSTER_PATH").ok(),
        })
    }
}

/// Configuration errors. Every variable has a default, so a value that
/// fails to parse is the only way loading can go wrong.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
