// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (loopback by default, the service is single-device)
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Directory holding the card file
    pub data_dir: PathBuf,

    /// Well-known storage key; the card list lives in `<data_dir>/<key>.json`
    pub cards_storage_key: String,

    /// Google Geocoding API key (place-name detection is disabled without it)
    pub google_geocoding_api_key: String,

    /// How long reverse-geocoding results stay cached, in seconds
    pub geocode_cache_ttl_secs: u64,

    /// Outgoing reverse-geocoding requests allowed per second
    pub geocode_requests_per_second: u32,

    /// Radius applied to store locations that carry none, in meters
    pub default_detection_radius_m: f64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8003".to_string())
                .parse()
                .unwrap_or(8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),

            cards_storage_key: env::var("CARDS_STORAGE_KEY")
                .unwrap_or_else(|_| "all_rewards_cards".to_string()),

            google_geocoding_api_key: env::var("GOOGLE_GEOCODING_API_KEY")
                .unwrap_or_else(|_| String::new()),

            geocode_cache_ttl_secs: env::var("GEOCODE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),

            geocode_requests_per_second: env::var("GEOCODE_REQUESTS_PER_SECOND")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            default_detection_radius_m: env::var("DEFAULT_DETECTION_RADIUS_M")
                .unwrap_or_else(|_| "150".to_string())
                .parse()
                .unwrap_or(150.0),
        }
    }

    /// Path of the JSON file backing the card store
    pub fn cards_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.cards_storage_key))
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.cards_storage_key.trim().is_empty() {
            return Err("CARDS_STORAGE_KEY must not be empty".to_string());
        }

        if self.geocode_requests_per_second == 0 {
            return Err("GEOCODE_REQUESTS_PER_SECOND must be greater than zero".to_string());
        }

        if !(self.default_detection_radius_m > 0.0) {
            return Err("DEFAULT_DETECTION_RADIUS_M must be positive".to_string());
        }

        if self.google_geocoding_api_key.is_empty() {
            log::warn!("GOOGLE_GEOCODING_API_KEY not configured, place-name detection will never match");
        }

        Ok(())
    }
}
