use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub geocoder_base_url: String,
    pub geocoder_timeout_ms: u64,
    pub location_stale_secs: i64,
    pub report_interval_secs: u64,
    pub recent_locations_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
            geocoder_timeout_ms: parse_or_default("GEOCODER_TIMEOUT_MS", 5000)?,
            location_stale_secs: parse_or_default("LOCATION_STALE_SECS", 120)?,
            report_interval_secs: parse_or_default("REPORT_INTERVAL_SECS", 30)?,
            recent_locations_limit: parse_or_default("RECENT_LOCATIONS_LIMIT", 500)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            event_buffer_size: 1024,
            geocoder_base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            geocoder_timeout_ms: 5000,
            location_stale_secs: 120,
            report_interval_secs: 30,
            recent_locations_limit: 500,
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
