use serde::{Deserialize, Serialize};

/// Default viewport span around a single point, in degrees. Matches the zoom
/// level the mobile client opens the map with.
pub const DEFAULT_SPAN_DEG: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A map viewport: a center plus the visible span in each axis.
///
/// Immutable by convention; a new `Position` replaces the previous viewport
/// rather than mutating it in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub lat_delta: f64,
    pub lon_delta: f64,
}

impl Position {
    /// Viewport centered on `coord` at the default zoom.
    pub fn around(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat,
            lon: coord.lon,
            lat_delta: DEFAULT_SPAN_DEG,
            lon_delta: DEFAULT_SPAN_DEG,
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Axis-aligned bounds of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionBounds {
    /// Bounds covering every point of `path`, or `None` for an empty path.
    pub fn covering(path: &[Coordinate]) -> Option<Self> {
        let first = path.first()?;
        let mut bounds = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for point in &path[1..] {
            bounds.min_lat = bounds.min_lat.min(point.lat);
            bounds.max_lat = bounds.max_lat.max(point.lat);
            bounds.min_lon = bounds.min_lon.min(point.lon);
            bounds.max_lon = bounds.max_lon.max(point.lon);
        }
        Some(bounds)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lon >= self.min_lon
            && coord.lon <= self.max_lon
    }
}

/// An open ride request as the client reasons about it, after the wire
/// representation has been parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: i64,
    pub requester_id: Option<i64>,
    /// Where the passenger wants to be picked up.
    pub origin: Coordinate,
    /// Where the passenger is going, when the backend sent it. Not used for
    /// the driver's route preview.
    pub destination: Option<Coordinate>,
    pub address: String,
    pub assigned_driver_id: Option<i64>,
}

impl RideRequest {
    /// A request is open while no driver has claimed it.
    pub fn is_open(&self) -> bool {
        self.assigned_driver_id.is_none()
    }
}

/// A ride request joined with the requester's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRideRequest {
    #[serde(flatten)]
    pub request: RideRequest,
    pub requester_name: String,
}

/// A displayable route to a pickup point: the full polyline plus the viewport
/// that frames it. Owned by the selection flow and discarded when the
/// selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePreview {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub path: Vec<Coordinate>,
    pub viewport: Position,
}
