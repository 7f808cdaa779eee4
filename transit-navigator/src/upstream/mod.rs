//! Transit API access.
//!
//! This module provides the [`TransitSource`] seam the resolvers fetch
//! through, an HTTP implementation for the Winnipeg Transit v4 API, and a
//! mock implementation for tests and offline development.
//!
//! Key characteristics of the API:
//! - Every request is authorised by an `api-key` query parameter
//! - Name searches need a location context (`lat`, `lon`, `distance`)
//! - Numeric fields sometimes arrive as strings, and several fields have
//!   dashed and underscored spellings; [`types`] accepts all of them

mod client;
mod convert;
mod error;
mod mock;
mod source;
pub mod types;

pub use client::{TransitClient, TransitConfig};
pub use convert::{
    PathError, convert_first_trip, convert_route_schedule, convert_segment, convert_stop_schedule,
    decode_path, normalize_stop, normalize_stops,
};
pub use error::UpstreamError;
pub use mock::MockTransitSource;
pub use source::{StopQuery, TransitSource};
