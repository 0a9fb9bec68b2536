use crate::directions::{DirectionsError, DirectionsProvider};
use crate::models::{
    Coordinate, EnrichedRideRequest, Position, RegionBounds, RoutePreview, DEFAULT_SPAN_DEG,
};

/// Margin applied around a route when fitting the viewport, as a multiplier
/// on the route's raw span.
const VIEWPORT_PADDING: f64 = 1.2;

/// Turns a candidate request into a displayable route preview.
pub struct RouteResolver<D> {
    provider: D,
}

impl<D: DirectionsProvider> RouteResolver<D> {
    pub fn new(provider: D) -> Self {
        Self { provider }
    }

    /// Route from the driver's position to the request's PICKUP point. The
    /// passenger's own destination plays no part here; the driver is
    /// previewing the leg to the passenger.
    pub async fn preview_route(
        &self,
        origin: Position,
        request: &EnrichedRideRequest,
    ) -> Result<RoutePreview, DirectionsError> {
        let start = origin.center();
        let pickup = request.request.origin;
        let path = self.provider.polyline(start, pickup).await?;
        Ok(build_preview(start, pickup, path))
    }
}

fn build_preview(origin: Coordinate, destination: Coordinate, path: Vec<Coordinate>) -> RoutePreview {
    // Bounds cover the whole polyline, with the endpoints folded in so a
    // provider that trims them cannot push either marker off screen.
    let mut framed = path.clone();
    framed.push(origin);
    framed.push(destination);
    let bounds = RegionBounds::covering(&framed).unwrap_or(RegionBounds {
        min_lat: origin.lat,
        max_lat: origin.lat,
        min_lon: origin.lon,
        max_lon: origin.lon,
    });
    RoutePreview {
        origin,
        destination,
        path,
        viewport: fit_viewport(bounds),
    }
}

/// Viewport framing `bounds` with a padding margin on all sides, never
/// zooming in past the default single-point span.
pub fn fit_viewport(bounds: RegionBounds) -> Position {
    Position {
        lat: (bounds.min_lat + bounds.max_lat) / 2.0,
        lon: (bounds.min_lon + bounds.max_lon) / 2.0,
        lat_delta: ((bounds.max_lat - bounds.min_lat) * VIEWPORT_PADDING).max(DEFAULT_SPAN_DEG),
        lon_delta: ((bounds.max_lon - bounds.min_lon) * VIEWPORT_PADDING).max(DEFAULT_SPAN_DEG),
    }
}
