//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Badge, Countdown, RouteSchedule, Stop, StopSchedule, TripPlan};

/// Query for `/api/stops/near`.
#[derive(Debug, Deserialize)]
pub struct NearRequest {
    pub lat: f64,
    pub lon: f64,

    /// Radius in metres (defaults to the map radius)
    pub distance: Option<u32>,
}

/// Query for `/api/stops/search`.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Stop name or number
    pub q: String,

    /// Location hint; both or neither
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Radius around the hint in metres
    pub distance: Option<u32>,

    /// Only stops on this route
    pub route: Option<String>,

    /// Maximum results (defaults to the display limit)
    pub limit: Option<usize>,
}

/// Query for `/api/trips`.
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub origin: u64,
    pub destination: u64,
}

/// A list of stops.
#[derive(Debug, Serialize)]
pub struct StopListResponse {
    pub stops: Vec<Stop>,
}

/// A single stop, `null` when it could not be resolved.
#[derive(Debug, Serialize)]
pub struct StopDetailResponse {
    pub stop: Option<Stop>,
}

/// A departure with its countdown relative to the response time.
#[derive(Debug, Serialize)]
pub struct DepartureView {
    pub time: NaiveDateTime,
    pub live: bool,
    pub countdown: Countdown,
    /// Countdown as shown to riders, e.g. "3 mins"
    pub display: String,
}

/// A route's next departures.
#[derive(Debug, Serialize)]
pub struct RouteDepartures {
    pub number: String,
    pub name: String,
    pub badge: Badge,
    pub departures: Vec<DepartureView>,
}

impl RouteDepartures {
    /// Summarise a route's first `limit` usable departures as of `now`.
    pub fn from_schedule(route: &RouteSchedule, now: NaiveDateTime, limit: usize) -> Self {
        let departures = route
            .upcoming(limit)
            .filter_map(|t| {
                let time = t.departure.effective()?;
                let countdown = Countdown::until(time, now);
                Some(DepartureView {
                    time,
                    live: t.departure.is_live(),
                    countdown,
                    display: countdown.to_string(),
                })
            })
            .collect();

        Self {
            number: route.number.clone(),
            name: route.name.clone(),
            badge: route.badge.clone(),
            departures,
        }
    }
}

/// A stop schedule plus countdowns.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub generated_at: NaiveDateTime,
    pub schedule: Option<StopSchedule>,
    /// Empty when the schedule is unavailable or the stop is out of service
    pub departures: Vec<RouteDepartures>,
}

/// A trip plan, `null` when no itinerary was found.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub plan: Option<TripPlan>,
    pub summary: Option<TripSummary>,
}

/// Timeline overview of a plan.
#[derive(Debug, Serialize)]
pub struct TripSummary {
    pub departs: Option<NaiveDateTime>,
    pub arrives: Option<NaiveDateTime>,
    pub rides: usize,
    /// One label per segment, in order
    pub steps: Vec<String>,
}

impl TripSummary {
    pub fn from_plan(plan: &TripPlan) -> Self {
        let span = plan.span();
        Self {
            departs: span.start,
            arrives: span.end,
            rides: plan.rides(),
            steps: plan.segments.iter().map(|s| s.label()).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
