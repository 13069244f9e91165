//! Configuration module for checkout-service.

use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Fallback credentials used when the environment does not provide any.
/// They only work against nothing; real deployments must set both variables.
pub const FALLBACK_RAZORPAY_KEY_ID: &str = "rzp_test_YOUR_TEST_KEY";
pub const FALLBACK_RAZORPAY_KEY_SECRET: &str = "YOUR_SECRET_KEY";

const DEFAULT_CORS_ORIGINS: [&str; 2] = [
    "http://localhost:5173",
    "https://supermarket-self-checkout-wheat.vercel.app",
];

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub razorpay: RazorpayConfig,
    pub cors: CorsConfig,
    /// JSON file of products loaded into the catalogue at startup.
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base_url: String,
}

impl RazorpayConfig {
    /// True when either credential is the built-in placeholder.
    pub fn uses_fallback_credentials(&self) -> bool {
        self.key_id == FALLBACK_RAZORPAY_KEY_ID
            || self.key_secret.expose_secret() == FALLBACK_RAZORPAY_KEY_SECRET
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "checkout-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://supermarket.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
            },
            razorpay: RazorpayConfig {
                key_id: env::var("RAZORPAY_KEY_ID")
                    .unwrap_or_else(|_| FALLBACK_RAZORPAY_KEY_ID.to_string()),
                key_secret: Secret::new(
                    env::var("RAZORPAY_KEY_SECRET")
                        .unwrap_or_else(|_| FALLBACK_RAZORPAY_KEY_SECRET.to_string()),
                ),
                api_base_url: env::var("RAZORPAY_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
            },
            cors: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|raw| CorsConfig {
                    allowed_origins: parse_origins(&raw),
                })
                .unwrap_or_default(),
            seed_file: env::var("PRODUCT_SEED_FILE").ok().map(PathBuf::from),
        })
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_origins() {
        let origins = parse_origins(" http://localhost:5173, ,https://kiosk.example.com ");
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "https://kiosk.example.com"]
        );
    }

    #[test]
    fn default_cors_allows_dev_and_deployed_frontend() {
        let cors = CorsConfig::default();
        assert_eq!(cors.allowed_origins.len(), 2);
        assert!(cors
            .allowed_origins
            .contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn detects_fallback_credentials() {
        let config = RazorpayConfig {
            key_id: FALLBACK_RAZORPAY_KEY_ID.to_string(),
            key_secret: Secret::new("real-secret".to_string()),
            api_base_url: "https://api.razorpay.com/v1".to_string(),
        };
        assert!(config.uses_fallback_credentials());

        let config = RazorpayConfig {
            key_id: "rzp_live_abc".to_string(),
            ..config
        };
        assert!(!config.uses_fallback_credentials());
    }
}
