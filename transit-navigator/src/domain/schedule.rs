//! Live stop schedules.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::stop::Stop;
use super::time::Countdown;

/// A route's display badge.
///
/// Colors are CSS color strings exactly as upstream supplies them; `None`
/// leaves the choice to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// A scheduled time and, when the vehicle is tracked, its live estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimePair {
    pub scheduled: Option<NaiveDateTime>,
    pub estimated: Option<NaiveDateTime>,
}

impl TimePair {
    /// The estimate when present, otherwise the scheduled time.
    pub fn effective(&self) -> Option<NaiveDateTime> {
        self.estimated.or(self.scheduled)
    }

    /// Whether [`TimePair::effective`] comes from live tracking.
    pub fn is_live(&self) -> bool {
        self.estimated.is_some()
    }

    /// Countdown to the effective time, if there is one.
    pub fn countdown(&self, now: NaiveDateTime) -> Option<Countdown> {
        self.effective().map(|t| Countdown::until(t, now))
    }
}

/// One vehicle's visit to the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StopTime {
    pub departure: TimePair,
    pub arrival: TimePair,
}

/// Upcoming visits of one route to a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSchedule {
    pub key: Option<u64>,
    pub number: String,
    pub name: String,
    pub badge: Badge,
    /// In upstream order.
    pub times: Vec<StopTime>,
}

impl RouteSchedule {
    /// The first `n` visits that have a usable departure time.
    pub fn upcoming(&self, n: usize) -> impl Iterator<Item = &StopTime> {
        self.times
            .iter()
            .filter(|t| t.departure.effective().is_some())
            .take(n)
    }

    /// Whether any listed departure is live-tracked.
    pub fn has_live_departure(&self) -> bool {
        self.times.iter().any(|t| t.departure.is_live())
    }
}

/// Route schedules at a stop.
///
/// Upstream omits the field entirely when schedule data is unavailable,
/// and sends an empty list when nothing is scheduled right now. The two
/// are shown differently, so they are kept apart here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "routes", rename_all = "snake_case")]
pub enum RouteSchedules {
    Unavailable,
    Available(Vec<RouteSchedule>),
}

impl RouteSchedules {
    pub fn is_available(&self) -> bool {
        matches!(self, RouteSchedules::Available(_))
    }

    /// Route schedules, empty when unavailable.
    pub fn routes(&self) -> &[RouteSchedule] {
        match self {
            RouteSchedules::Unavailable => &[],
            RouteSchedules::Available(routes) => routes,
        }
    }

    /// Available but with no routes listed.
    pub fn is_out_of_service(&self) -> bool {
        matches!(self, RouteSchedules::Available(routes) if routes.is_empty())
    }
}

/// A stop with its upcoming service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSchedule {
    pub stop: Stop,
    pub routes: RouteSchedules,
}
