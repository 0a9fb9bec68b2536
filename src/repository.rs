use futures_util::future::join_all;
use tracing::warn;

use crate::backend::RideApi;
use crate::models::{EnrichedRideRequest, RideRequest};

/// Shown when a requester's display name cannot be resolved.
pub const NAME_UNAVAILABLE: &str = "name unavailable";

/// Produces the displayable list of open ride requests: fetch, filter to
/// unclaimed rides, and join each with its requester's display name.
pub struct RideRequestRepository<A> {
    api: A,
}

impl<A: RideApi> RideRequestRepository<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Fetch every open request, enriched with requester names.
    ///
    /// Fail-soft throughout: a failed list fetch yields an empty list, a
    /// malformed record is dropped, and a failed name lookup defaults that
    /// one entry to [`NAME_UNAVAILABLE`]. The name lookups for a batch run
    /// concurrently and the batch is returned only once all of them have
    /// settled.
    pub async fn list_open_requests(&self) -> Vec<EnrichedRideRequest> {
        let records = match self.api.list_rides().await {
            Ok(records) => records,
            Err(err) => {
                warn!("failed to fetch ride requests: {err}");
                return Vec::new();
            }
        };

        let open: Vec<RideRequest> = records
            .into_iter()
            .filter(|record| record.assigned_driver_id.is_none())
            .filter_map(|record| {
                let id = record.id;
                let request = record.into_request();
                if request.is_none() {
                    warn!("dropping ride {id}: unparseable coordinates");
                }
                request
            })
            .collect();

        let enriched = open.into_iter().map(|request| async {
            let requester_name = self.resolve_name(request.requester_id).await;
            EnrichedRideRequest {
                request,
                requester_name,
            }
        });
        join_all(enriched).await
    }

    async fn resolve_name(&self, requester_id: Option<i64>) -> String {
        let Some(requester_id) = requester_id else {
            return NAME_UNAVAILABLE.to_string();
        };
        match self.api.fetch_user(requester_id).await {
            Ok(user) => user.name,
            Err(err) => {
                warn!("name lookup failed for user {requester_id}: {err}");
                NAME_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, FinishedRide, RideRecord, UserRecord};
    use crate::vehicle::Vehicle;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct FakeApi {
        rides: Result<serde_json::Value, ()>,
        users: HashMap<i64, String>,
    }

    #[async_trait]
    impl RideApi for FakeApi {
        async fn list_rides(&self) -> Result<Vec<RideRecord>, BackendError> {
            match &self.rides {
                Ok(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                Err(()) => Err(BackendError::Status(500)),
            }
        }

        async fn fetch_user(&self, user_id: i64) -> Result<UserRecord, BackendError> {
            match self.users.get(&user_id) {
                Some(name) => Ok(UserRecord { name: name.clone() }),
                None => Err(BackendError::Status(404)),
            }
        }

        async fn accept_ride(&self, _: i64, _: i64) -> Result<(), BackendError> {
            unreachable!("not exercised here")
        }

        async fn register_vehicle(&self, _: &Vehicle) -> Result<(), BackendError> {
            unreachable!("not exercised here")
        }

        async fn finished_rides(&self, _: i64) -> Result<Vec<FinishedRide>, BackendError> {
            unreachable!("not exercised here")
        }
    }

    fn ride(id: i64, requester: Option<i64>, driver: Option<i64>) -> serde_json::Value {
        json!({
            "id": id,
            "IdUserCorrida": requester,
            "latitudeUserOrigem": "10.0",
            "longitudeUserOrigem": "20.0",
            "endereco": "Rua A",
            "idUserMotorista": driver
        })
    }

    #[tokio::test]
    async fn claimed_rides_never_appear() {
        let repo = RideRequestRepository::new(FakeApi {
            rides: Ok(json!([ride(1, Some(7), None), ride(2, Some(8), Some(3))])),
            users: HashMap::from([(7, "Ana".into()), (8, "Bruno".into())]),
        });
        let requests = repo.list_open_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request.id, 1);
    }

    #[tokio::test]
    async fn resolves_requester_names() {
        let repo = RideRequestRepository::new(FakeApi {
            rides: Ok(json!([ride(1, Some(7), None)])),
            users: HashMap::from([(7, "Ana".into())]),
        });
        let requests = repo.list_open_requests().await;
        assert_eq!(requests[0].requester_name, "Ana");
        assert_eq!(requests[0].request.origin.lat, 10.0);
        assert_eq!(requests[0].request.origin.lon, 20.0);
    }

    #[tokio::test]
    async fn failed_lookup_defaults_only_that_entry() {
        let repo = RideRequestRepository::new(FakeApi {
            rides: Ok(json!([ride(1, Some(7), None), ride(2, Some(99), None)])),
            users: HashMap::from([(7, "Ana".into())]),
        });
        let requests = repo.list_open_requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].requester_name, "Ana");
        assert_eq!(requests[1].requester_name, NAME_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_requester_id_uses_placeholder_without_lookup() {
        let repo = RideRequestRepository::new(FakeApi {
            rides: Ok(json!([ride(1, None, None)])),
            users: HashMap::new(),
        });
        let requests = repo.list_open_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].requester_name, NAME_UNAVAILABLE);
    }

    #[tokio::test]
    async fn list_failure_yields_empty_list() {
        let repo = RideRequestRepository::new(FakeApi {
            rides: Err(()),
            users: HashMap::new(),
        });
        assert!(repo.list_open_requests().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_record_is_dropped_not_fatal() {
        let mut bad = ride(3, Some(7), None);
        bad["latitudeUserOrigem"] = json!("oops");
        let repo = RideRequestRepository::new(FakeApi {
            rides: Ok(json!([ride(1, Some(7), None), bad])),
            users: HashMap::from([(7, "Ana".into())]),
        });
        let requests = repo.list_open_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request.id, 1);
    }
}
