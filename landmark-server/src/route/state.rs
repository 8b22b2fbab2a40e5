//! Route request state.

use crate::directions::{FailureReason, RouteMetrics};
use crate::domain::LandmarkId;

/// State of the route for the selected landmark.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
    /// No landmark has been selected yet.
    Idle,

    /// A route to the landmark is being fetched.
    Loading { landmark: LandmarkId },

    /// The route to the landmark is known.
    Ready {
        landmark: LandmarkId,
        route: RouteMetrics,
    },

    /// The route to the landmark could not be fetched.
    Failed {
        landmark: LandmarkId,
        reason: FailureReason,
    },
}

impl RouteState {
    /// The landmark this state refers to, `None` when idle.
    pub fn landmark(&self) -> Option<&LandmarkId> {
        match self {
            RouteState::Idle => None,
            RouteState::Loading { landmark }
            | RouteState::Ready { landmark, .. }
            | RouteState::Failed { landmark, .. } => Some(landmark),
        }
    }

    /// Whether a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, RouteState::Loading { .. })
    }
}

/// Outcome of a single route request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The request was still current; its result is now the route state.
    Applied(RouteState),

    /// A later request was issued first, so this result was discarded.
    Superseded,
}
