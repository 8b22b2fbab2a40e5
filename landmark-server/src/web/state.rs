//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::LandmarkCatalog;
use crate::domain::WeekInstant;
use crate::route::RouteCoordinator;

/// Source of the current time of week.
pub type Clock = Arc<dyn Fn() -> WeekInstant + Send + Sync>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Landmarks and feedback
    pub catalog: Arc<LandmarkCatalog>,

    /// Route coordination for the selected landmark
    pub routes: RouteCoordinator,

    /// Time used for open/closed status
    pub clock: Clock,
}

impl AppState {
    /// Create a new app state using the local wall clock.
    pub fn new(catalog: LandmarkCatalog, routes: RouteCoordinator) -> Self {
        Self {
            catalog: Arc::new(catalog),
            routes,
            clock: Arc::new(WeekInstant::now),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Fn() -> WeekInstant + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The current time of week.
    pub fn now(&self) -> WeekInstant {
        (self.clock)()
    }
}
