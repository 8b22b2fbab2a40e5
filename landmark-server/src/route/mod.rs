//! Route coordination for the selected landmark.

mod coordinator;
mod state;

pub use coordinator::{RouteCoordinator, RouteSubscription, RouteTask};
pub use state::{Completion, RouteState};
