//! The fetch capability the resolvers depend on.

use std::future::Future;

use chrono::NaiveDateTime;

use crate::domain::{Coordinate, StopKey};

use super::error::UpstreamError;
use super::types::{StopResponse, StopScheduleResponse, StopsResponse, TripsResponse};

/// Parameters of a `stops.json` request.
///
/// Proximity is always given: the API rejects name searches without a
/// location context.
#[derive(Debug, Clone, PartialEq)]
pub struct StopQuery {
    /// Stop name or number to match, if any.
    pub name: Option<String>,
    /// Route the stops must be served by.
    pub route: Option<String>,
    pub near: Coordinate,
    /// Search radius around `near`, in metres.
    pub distance: u32,
}

impl StopQuery {
    /// All stops within `distance` metres of `near`.
    pub fn near(near: Coordinate, distance: u32) -> Self {
        Self {
            name: None,
            route: None,
            near,
            distance,
        }
    }

    /// Restrict to stops matching a name or number.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to stops served by a route.
    pub fn on_route(mut self, route: Option<String>) -> Self {
        self.route = route;
        self
    }
}

/// Access to the transit API.
///
/// Returns raw response DTOs; normalization happens in the resolvers. This
/// abstraction lets the resolvers run against fixtures and scripted mocks.
pub trait TransitSource: Send + Sync {
    /// Stops matching a query.
    fn stops(
        &self,
        query: &StopQuery,
    ) -> impl Future<Output = Result<StopsResponse, UpstreamError>> + Send;

    /// A single stop by key.
    fn stop(&self, key: StopKey) -> impl Future<Output = Result<StopResponse, UpstreamError>> + Send;

    /// Upcoming schedule at a stop, starting at `start`, capped per route.
    fn stop_schedule(
        &self,
        key: StopKey,
        max_results_per_route: u8,
        start: NaiveDateTime,
    ) -> impl Future<Output = Result<StopScheduleResponse, UpstreamError>> + Send;

    /// Trip itineraries between two stops.
    fn trips(
        &self,
        origin: StopKey,
        destination: StopKey,
    ) -> impl Future<Output = Result<TripsResponse, UpstreamError>> + Send;
}
