use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Coordinate, Position};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    /// The user refused the foreground-location permission. Fatal for map
    /// initialization; callers surface it instead of retrying.
    #[error("location permission denied")]
    PermissionDenied,
    #[error("no position fix available")]
    Unavailable,
}

/// Source of the device's current position. Resolves once the permission
/// prompt has been answered and a fix is obtained; no state survives the call.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Position supplied through configuration. Stands in for the device GPS when
/// the client runs on a desk instead of a phone; `None` behaves like a device
/// that cannot produce a fix.
pub struct ConfiguredLocation {
    position: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        self.position
            .map(Position::around)
            .ok_or(LocationError::Unavailable)
    }
}
