use thiserror::Error;

use crate::backend::BackendError;
use crate::directions::DirectionsError;
use crate::location::LocationError;
use crate::vehicle::VehicleError;

/// Umbrella error for the ride-request flow. Each variant wraps the error of
/// the boundary that produced it.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("location error: {0}")]
    Location(#[from] LocationError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("directions error: {0}")]
    Directions(#[from] DirectionsError),
    #[error("vehicle error: {0}")]
    Vehicle(#[from] VehicleError),
}
