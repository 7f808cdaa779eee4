//! Web layer for the transit navigator.
//!
//! Provides JSON endpoints for finding stops, reading their schedules and
//! planning trips.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
