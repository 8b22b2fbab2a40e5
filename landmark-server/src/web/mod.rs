//! Web layer for the landmark server.
//!
//! Provides JSON endpoints for browsing landmarks and routing to them.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Clock};
