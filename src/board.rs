//! The request-board screen: a map plus the overlay list of open requests.
//!
//! This is the composition root of the discovery flow. It owns the one-shot
//! position fix, the request list, and the selection controller; the view
//! layer renders snapshots and forwards taps.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::backend::RideApi;
use crate::directions::DirectionsProvider;
use crate::location::{LocationError, LocationSource};
use crate::models::{EnrichedRideRequest, Position};
use crate::repository::RideRequestRepository;
use crate::selection::SelectionController;
use crate::session::Session;

/// What the view renders after opening or refreshing the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    /// The device position, when a fix was obtained. `None` means the map
    /// renders without a current-location marker.
    pub position: Option<Position>,
    /// Why the position is missing. `PermissionDenied` is fatal for the map;
    /// the request list is unaffected either way.
    pub location_error: Option<LocationError>,
    pub requests: Vec<EnrichedRideRequest>,
}

pub struct RideBoard<L, D, A> {
    location: L,
    repository: RideRequestRepository<Arc<A>>,
    controller: SelectionController<D, A>,
    position: Mutex<Option<Position>>,
}

impl<L, D, A> RideBoard<L, D, A>
where
    L: LocationSource,
    D: DirectionsProvider,
    A: RideApi,
{
    pub fn new(session: Session, location: L, provider: D, api: Arc<A>) -> Self {
        Self {
            location,
            repository: RideRequestRepository::new(Arc::clone(&api)),
            controller: SelectionController::new(provider, api, session),
            position: Mutex::new(None),
        }
    }

    /// Mount the screen: the position fix and the request fetch run
    /// concurrently, and neither one's failure disturbs the other.
    pub async fn open(&self) -> BoardSnapshot {
        let (fix, requests) = tokio::join!(
            self.location.current_position(),
            self.repository.list_open_requests()
        );

        let (position, location_error) = match fix {
            Ok(position) => {
                *self.position.lock().await = Some(position);
                (Some(position), None)
            }
            Err(err) => {
                error!("no device position: {err}");
                (None, Some(err))
            }
        };

        info!("request board opened with {} open requests", requests.len());
        BoardSnapshot {
            position,
            location_error,
            requests,
        }
    }

    /// Re-fetch the open-request list on demand.
    pub async fn refresh_requests(&self) -> Vec<EnrichedRideRequest> {
        self.repository.list_open_requests().await
    }

    /// A tap on a list entry, forwarded to the selection flow with whatever
    /// position the screen acquired at mount.
    pub async fn tap(&self, request: EnrichedRideRequest) {
        let origin = *self.position.lock().await;
        self.controller.select(origin, request).await;
    }

    pub fn controller(&self) -> &SelectionController<D, A> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, FinishedRide, RideRecord, UserRecord};
    use crate::directions::DirectionsError;
    use crate::models::Coordinate;
    use crate::selection::SelectionState;
    use crate::vehicle::Vehicle;
    use async_trait::async_trait;

    struct DeniedLocation;

    #[async_trait]
    impl LocationSource for DeniedLocation {
        async fn current_position(&self) -> Result<Position, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    struct FixedLocation(Coordinate);

    #[async_trait]
    impl LocationSource for FixedLocation {
        async fn current_position(&self) -> Result<Position, LocationError> {
            Ok(Position::around(self.0))
        }
    }

    struct StraightLineProvider;

    #[async_trait]
    impl DirectionsProvider for StraightLineProvider {
        async fn polyline(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<Vec<Coordinate>, DirectionsError> {
            Ok(vec![origin, destination])
        }
    }

    struct OneRideApi;

    #[async_trait]
    impl RideApi for OneRideApi {
        async fn list_rides(&self) -> Result<Vec<RideRecord>, BackendError> {
            Ok(serde_json::from_str(
                r#"[{
                    "id": 1,
                    "IdUserCorrida": 7,
                    "latitudeUserOrigem": "10.0",
                    "longitudeUserOrigem": "20.0",
                    "endereco": "Rua A",
                    "idUserMotorista": null
                }]"#,
            )
            .unwrap())
        }

        async fn fetch_user(&self, _: i64) -> Result<UserRecord, BackendError> {
            Ok(UserRecord { name: "Ana".into() })
        }

        async fn accept_ride(&self, _: i64, _: i64) -> Result<(), BackendError> {
            Ok(())
        }

        async fn register_vehicle(&self, _: &Vehicle) -> Result<(), BackendError> {
            Ok(())
        }

        async fn finished_rides(&self, _: i64) -> Result<Vec<FinishedRide>, BackendError> {
            Ok(Vec::new())
        }
    }

    fn board<L: LocationSource>(location: L) -> RideBoard<L, StraightLineProvider, OneRideApi> {
        RideBoard::new(
            Session::new(42, "Driver"),
            location,
            StraightLineProvider,
            Arc::new(OneRideApi),
        )
    }

    #[tokio::test]
    async fn permission_denial_does_not_block_the_list() {
        let snapshot = board(DeniedLocation).open().await;
        assert_eq!(snapshot.position, None);
        assert_eq!(snapshot.location_error, Some(LocationError::PermissionDenied));
        assert_eq!(snapshot.requests.len(), 1);
        assert_eq!(snapshot.requests[0].requester_name, "Ana");
    }

    #[tokio::test]
    async fn tap_routes_from_the_acquired_fix() {
        let here = Coordinate::new(-23.55, -46.63);
        let board = board(FixedLocation(here));
        let snapshot = board.open().await;

        board.tap(snapshot.requests[0].clone()).await;
        let preview = board.controller().route_preview().await.unwrap();
        assert_eq!(preview.origin, here);
        assert_eq!(preview.destination, Coordinate::new(10.0, 20.0));
        assert!(matches!(
            board.controller().state().await,
            SelectionState::ConfirmingAcceptance(_)
        ));
    }

    #[tokio::test]
    async fn tap_without_fix_still_opens_dialog() {
        let board = board(DeniedLocation);
        let snapshot = board.open().await;
        board.tap(snapshot.requests[0].clone()).await;
        assert!(board.controller().route_preview().await.is_none());
        assert!(matches!(
            board.controller().state().await,
            SelectionState::ConfirmingAcceptance(_)
        ));
    }
}
