//! REST boundary of the ride backend.
//!
//! The backend speaks Portuguese field names and sends coordinates as strings;
//! everything here converts that wire shape into the domain types of
//! [`crate::models`] before anyone else sees it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::{Coordinate, RideRequest};
use crate::vehicle::Vehicle;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(u16),
}

/// A ride as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RideRecord {
    pub id: i64,
    #[serde(rename = "IdUserCorrida", default)]
    pub requester_id: Option<i64>,
    #[serde(rename = "latitudeUserOrigem")]
    pub origin_lat: String,
    #[serde(rename = "longitudeUserOrigem")]
    pub origin_lon: String,
    #[serde(rename = "latitudeUserDestino", default)]
    pub destination_lat: Option<String>,
    #[serde(rename = "longitudeUserDestino", default)]
    pub destination_lon: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "idUserMotorista", default)]
    pub assigned_driver_id: Option<i64>,
}

impl RideRecord {
    /// Parse the stringly-typed coordinates into a domain request. `None`
    /// means the record is malformed; callers drop it rather than pinning a
    /// ride at coordinates it never had.
    pub fn into_request(self) -> Option<RideRequest> {
        let origin = Coordinate {
            lat: self.origin_lat.trim().parse().ok()?,
            lon: self.origin_lon.trim().parse().ok()?,
        };
        let destination = match (self.destination_lat, self.destination_lon) {
            (Some(lat), Some(lon)) => Some(Coordinate {
                lat: lat.trim().parse().ok()?,
                lon: lon.trim().parse().ok()?,
            }),
            _ => None,
        };
        Some(RideRequest {
            id: self.id,
            requester_id: self.requester_id,
            origin,
            destination,
            address: self.address,
            assigned_driver_id: self.assigned_driver_id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "nome")]
    pub name: String,
}

/// A completed ride from the passenger's history.
#[derive(Debug, Clone, Deserialize)]
pub struct FinishedRide {
    #[serde(rename = "IdCorrida")]
    pub id: i64,
    #[serde(rename = "hr_saida", deserialize_with = "deserialize_departure")]
    pub departed_at: NaiveDateTime,
    #[serde(rename = "latitudeUserOrigem", default)]
    pub origin_lat: String,
    #[serde(rename = "longitudeUserOrigem", default)]
    pub origin_lon: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
}

const DEPARTURE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

fn deserialize_departure<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    // The backend is inconsistent about the separator; accept both.
    let trimmed = raw.trim_end_matches('Z');
    DEPARTURE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized departure time: {raw}")))
}

#[derive(Debug, Serialize)]
struct AcceptBody {
    #[serde(rename = "idUserMotorista")]
    driver_id: i64,
}

/// Everything the client asks of the ride backend.
#[async_trait]
pub trait RideApi: Send + Sync {
    /// `GET /corrida/` — every ride the backend knows about, open or not.
    async fn list_rides(&self) -> Result<Vec<RideRecord>, BackendError>;

    /// `GET /user/{id}` — display data for one user.
    async fn fetch_user(&self, user_id: i64) -> Result<UserRecord, BackendError>;

    /// `POST /corrida/{id}/aceitar` — claim a ride for a driver. The backend
    /// owns the assignment; a success here only means the trigger was taken.
    async fn accept_ride(&self, ride_id: i64, driver_id: i64) -> Result<(), BackendError>;

    /// `POST /veiculo` — register the driver's vehicle.
    async fn register_vehicle(&self, vehicle: &Vehicle) -> Result<(), BackendError>;

    /// `GET /corrida/finalizadas/passageiro/{id}` — a passenger's completed rides.
    async fn finished_rides(&self, passenger_id: i64) -> Result<Vec<FinishedRide>, BackendError>;
}

#[async_trait]
impl<T: RideApi + ?Sized> RideApi for std::sync::Arc<T> {
    async fn list_rides(&self) -> Result<Vec<RideRecord>, BackendError> {
        (**self).list_rides().await
    }

    async fn fetch_user(&self, user_id: i64) -> Result<UserRecord, BackendError> {
        (**self).fetch_user(user_id).await
    }

    async fn accept_ride(&self, ride_id: i64, driver_id: i64) -> Result<(), BackendError> {
        (**self).accept_ride(ride_id, driver_id).await
    }

    async fn register_vehicle(&self, vehicle: &Vehicle) -> Result<(), BackendError> {
        (**self).register_vehicle(vehicle).await
    }

    async fn finished_rides(&self, passenger_id: i64) -> Result<Vec<FinishedRide>, BackendError> {
        (**self).finished_rides(passenger_id).await
    }
}

/// reqwest-backed [`RideApi`] with a bounded timeout on every call.
pub struct HttpRideApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRideApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(BackendError::Status(status.as_u16()))
    }
}

#[async_trait]
impl RideApi for HttpRideApi {
    async fn list_rides(&self) -> Result<Vec<RideRecord>, BackendError> {
        let response = self.client.get(self.url("/corrida/")).send().await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn fetch_user(&self, user_id: i64) -> Result<UserRecord, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/user/{user_id}")))
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn accept_ride(&self, ride_id: i64, driver_id: i64) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(&format!("/corrida/{ride_id}/aceitar")))
            .json(&AcceptBody { driver_id })
            .send()
            .await?;
        check_status(&response)
    }

    async fn register_vehicle(&self, vehicle: &Vehicle) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/veiculo"))
            .json(vehicle)
            .send()
            .await?;
        check_status(&response)
    }

    async fn finished_rides(&self, passenger_id: i64) -> Result<Vec<FinishedRide>, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/corrida/finalizadas/passageiro/{passenger_id}")))
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }
}
