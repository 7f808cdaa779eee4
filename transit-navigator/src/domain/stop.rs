//! Canonical transit stop.

use std::fmt;

use serde::Serialize;

use super::geo::Coordinate;

/// Ratio applied to a straight-line distance to approximate walking distance.
const WALKING_FACTOR: f64 = 1.25;

/// Upstream identity of a stop.
///
/// This is the key used for schedule and trip requests, not the number
/// printed on the stop sign (see [`Stop::number`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StopKey(pub u64);

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distances from the reference point of the query to a stop, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distances {
    /// Straight-line distance as reported upstream.
    pub direct: f64,
    /// Derived walking estimate, see [`walking_estimate`].
    pub walking: f64,
}

impl Distances {
    /// Build distances from an upstream direct distance.
    pub fn from_direct(direct: f64) -> Self {
        Self {
            direct,
            walking: walking_estimate(direct),
        }
    }
}

/// Approximate walking distance from a straight-line distance.
///
/// This is a flat 25% detour allowance, not a routed distance. Treat it as
/// an indication for display only.
///
/// # Examples
///
/// ```
/// use transit_navigator::domain::walking_estimate;
///
/// assert_eq!(walking_estimate(100.0), 125.0);
/// assert_eq!(walking_estimate(333.0), 416.0);
/// ```
pub fn walking_estimate(direct_meters: f64) -> f64 {
    (direct_meters * WALKING_FACTOR).round()
}

/// A transit stop in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub key: StopKey,
    pub name: String,
    /// Number shown on the stop sign.
    pub number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Always present; `(0,0)` when upstream gave no position.
    pub geographic: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<Distances>,
}

impl Stop {
    /// Whether this stop can be placed on a map.
    pub fn is_mappable(&self) -> bool {
        self.geographic.is_mappable()
    }

    /// Case-insensitive match on the name, or a substring match on the
    /// stop number.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.number.to_string().contains(query)
    }
}

/// Keep only stops with a drawable position, preserving order.
pub fn retain_mappable(stops: Vec<Stop>) -> Vec<Stop> {
    stops.into_iter().filter(Stop::is_mappable).collect()
}

/// Truncate a result list to what a result panel shows.
pub fn truncate_for_display(mut stops: Vec<Stop>, limit: usize) -> Vec<Stop> {
    stops.truncate(limit);
    stops
}
