use std::time::Duration;

use crate::models::Coordinate;

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_DIRECTIONS_URL: &str = "https://api.openrouteservice.org";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the client, read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the ride backend.
    pub backend_url: String,
    /// Base URL of the directions provider.
    pub directions_url: String,
    /// API key for the directions provider. Validated by the provider, not by us.
    pub directions_api_key: String,
    /// Upper bound applied to every outbound HTTP call.
    pub request_timeout: Duration,
    /// Stand-in for the device GPS fix when running outside a device.
    pub start_position: Option<Coordinate>,
}

impl ClientConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for everything except the directions API key.
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var("CARONAS_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
        let directions_url = std::env::var("CARONAS_DIRECTIONS_URL")
            .unwrap_or_else(|_| DEFAULT_DIRECTIONS_URL.into());
        let directions_api_key = std::env::var("CARONAS_DIRECTIONS_KEY").unwrap_or_default();
        let request_timeout = std::env::var("CARONAS_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let start_position = parse_position(std::env::var("CARONAS_START_POSITION").ok());

        Self {
            backend_url,
            directions_url,
            directions_api_key,
            request_timeout,
            start_position,
        }
    }
}

/// Parse `"lat,lon"` into a coordinate. Anything else is ignored.
fn parse_position(raw: Option<String>) -> Option<Coordinate> {
    let raw = raw?;
    let (lat, lon) = raw.split_once(',')?;
    Some(Coordinate {
        lat: lat.trim().parse().ok()?,
        lon: lon.trim().parse().ok()?,
    })
}
