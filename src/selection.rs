//! Selection flow for the request board: which ride is under review, the
//! route overlay on the map, and the confirmation dialog.
//!
//! All map state here has a single writer. Every overlapping concern (a tap
//! on a second ride while the first route is still resolving, a dismiss
//! racing an in-flight preview) is settled by a generation counter: only the
//! async work started for the current generation may touch the viewport.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::RideApi;
use crate::directions::DirectionsProvider;
use crate::models::{EnrichedRideRequest, Position, RoutePreview};
use crate::route::RouteResolver;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    PreviewingRoute(EnrichedRideRequest),
    ConfirmingAcceptance(EnrichedRideRequest),
    Accepting(EnrichedRideRequest),
}

/// User-visible outcome notices, drained by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    AcceptanceConfirmed { ride_id: i64 },
    AcceptanceFailed { ride_id: i64 },
}

/// Result of a confirm interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptOutcome {
    Accepted,
    Failed,
    /// Confirm arrived while no dialog was open; nothing was sent.
    NothingSelected,
}

struct Flow {
    state: SelectionState,
    generation: u64,
    preview: Option<RoutePreview>,
    viewport: Option<Position>,
    notices: Vec<Notice>,
}

pub struct SelectionController<D, A> {
    resolver: RouteResolver<D>,
    api: Arc<A>,
    session: Session,
    flow: Mutex<Flow>,
}

impl<D: DirectionsProvider, A: RideApi> SelectionController<D, A> {
    pub fn new(provider: D, api: Arc<A>, session: Session) -> Self {
        Self {
            resolver: RouteResolver::new(provider),
            api,
            session,
            flow: Mutex::new(Flow {
                state: SelectionState::Idle,
                generation: 0,
                preview: None,
                viewport: None,
                notices: Vec::new(),
            }),
        }
    }

    /// A tap on a list entry. Resolves the route to the pickup point, fits
    /// the viewport, and opens the confirmation dialog.
    ///
    /// Selecting supersedes any in-flight selection: a route result that
    /// arrives for an older tap is discarded, never applied to the map. A
    /// missing driver position or an unavailable route skips the overlay but
    /// still opens the dialog; the preview is cosmetic, not a precondition.
    pub async fn select(&self, origin: Option<Position>, request: EnrichedRideRequest) {
        let my_generation = {
            let mut flow = self.flow.lock().await;
            flow.generation += 1;
            flow.state = SelectionState::PreviewingRoute(request.clone());
            flow.preview = None;
            flow.generation
        };

        let preview = match origin {
            Some(origin) => match self.resolver.preview_route(origin, &request).await {
                Ok(preview) => Some(preview),
                Err(err) => {
                    warn!("route preview unavailable for ride {}: {err}", request.request.id);
                    None
                }
            },
            None => None,
        };

        let mut flow = self.flow.lock().await;
        if flow.generation != my_generation {
            debug!("discarding stale route result for ride {}", request.request.id);
            return;
        }
        if let Some(preview) = preview {
            flow.viewport = Some(preview.viewport);
            flow.preview = Some(preview);
        }
        flow.state = SelectionState::ConfirmingAcceptance(request);
    }

    /// The dialog was dismissed. Clears the selection and the drawn route.
    pub async fn dismiss(&self) {
        let mut flow = self.flow.lock().await;
        flow.generation += 1;
        flow.state = SelectionState::Idle;
        flow.preview = None;
        flow.viewport = None;
    }

    /// The dialog was confirmed. Sends exactly one accept call for the ride
    /// under review, then returns to idle whether the backend said yes or no;
    /// a failed accept is not retryable from this screen.
    pub async fn confirm(&self) -> AcceptOutcome {
        let (request, my_generation) = {
            let mut flow = self.flow.lock().await;
            let SelectionState::ConfirmingAcceptance(request) = flow.state.clone() else {
                return AcceptOutcome::NothingSelected;
            };
            flow.state = SelectionState::Accepting(request.clone());
            (request, flow.generation)
        };

        let ride_id = request.request.id;
        let result = self.api.accept_ride(ride_id, self.session.user_id).await;

        let mut flow = self.flow.lock().await;
        let outcome = match result {
            Ok(()) => {
                info!("accepted ride {ride_id}");
                flow.notices.push(Notice::AcceptanceConfirmed { ride_id });
                AcceptOutcome::Accepted
            }
            Err(err) => {
                warn!("failed to accept ride {ride_id}: {err}");
                flow.notices.push(Notice::AcceptanceFailed { ride_id });
                AcceptOutcome::Failed
            }
        };
        // A newer selection owns the flow now; only reset our own.
        if flow.generation == my_generation {
            flow.state = SelectionState::Idle;
            flow.preview = None;
            flow.viewport = None;
        }
        outcome
    }

    pub async fn state(&self) -> SelectionState {
        self.flow.lock().await.state.clone()
    }

    pub async fn route_preview(&self) -> Option<RoutePreview> {
        self.flow.lock().await.preview.clone()
    }

    /// Where the map should be looking, when a preview asked for a fit.
    pub async fn viewport(&self) -> Option<Position> {
        self.flow.lock().await.viewport
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.flow.lock().await.notices)
    }
}
