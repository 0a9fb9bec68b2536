//! External directions provider.
//!
//! Speaks the OpenRouteService GeoJSON dialect: coordinates go out as
//! `[lon, lat]` pairs and the route comes back as a `LineString` geometry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::models::Coordinate;

#[derive(Debug, Error)]
pub enum DirectionsError {
    /// The provider could not produce a route. Non-fatal: the confirmation
    /// flow continues without a drawn route.
    #[error("no route available: {0}")]
    RouteUnavailable(String),
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Computes a drivable polyline between two coordinates.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn polyline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, DirectionsError>;
}

#[derive(Deserialize)]
struct DirectionsResponse {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    /// `[lon, lat]` pairs of the route LineString.
    coordinates: Vec<[f64; 2]>,
}

/// HTTP-backed [`DirectionsProvider`] with an API key and bounded timeout.
pub struct HttpDirections {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpDirections {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirections {
    async fn polyline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, DirectionsError> {
        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        let body = json!({
            "coordinates": [[origin.lon, origin.lat], [destination.lon, destination.lat]]
        });
        debug!("requesting directions {:?} -> {:?}", origin, destination);

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DirectionsError::RouteUnavailable(format!(
                "provider returned {status}: {detail}"
            )));
        }

        let parsed: DirectionsResponse = response.json().await?;
        let path: Vec<Coordinate> = parsed
            .features
            .into_iter()
            .next()
            .ok_or_else(|| DirectionsError::RouteUnavailable("empty response".into()))?
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate { lat, lon })
            .collect();

        if path.is_empty() {
            return Err(DirectionsError::RouteUnavailable("empty geometry".into()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geojson_coordinates_are_lon_lat() {
        let raw = r#"{
            "features": [
                {"geometry": {"coordinates": [[-46.63, -23.55], [-46.64, -23.56]]}}
            ]
        }"#;
        let parsed: DirectionsResponse = serde_json::from_str(raw).unwrap();
        let first = parsed.features[0].geometry.coordinates[0];
        let coord = Coordinate {
            lat: first[1],
            lon: first[0],
        };
        assert_eq!(coord.lat, -23.55);
        assert_eq!(coord.lon, -46.63);
    }
}
