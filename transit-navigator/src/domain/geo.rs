//! Geographic coordinates.

use std::fmt;

use serde::Serialize;

/// Downtown Winnipeg, used whenever no better position is known.
pub const CITY_CENTRE: Coordinate = Coordinate::new(49.8951, -97.1384);

/// A WGS84 position in degrees.
///
/// Coordinates built from upstream data may carry `NaN` components (the
/// upstream value was not numeric) or be the `(0,0)` placeholder used when
/// the upstream record had no position at all. Neither is a real position;
/// check [`Coordinate::is_mappable`] before placing anything on a map.
///
/// # Examples
///
/// ```
/// use transit_navigator::domain::Coordinate;
///
/// assert!(Coordinate::new(49.9, -97.1).is_mappable());
/// assert!(!Coordinate::UNKNOWN.is_mappable());
/// assert!(!Coordinate::new(f64::NAN, -97.1).is_mappable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Placeholder for "location not supplied by upstream".
    pub const UNKNOWN: Coordinate = Coordinate::new(0.0, 0.0);

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True for the `(0,0)` placeholder.
    pub fn is_unknown(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// True when both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// True when this coordinate can be drawn: valid and not the placeholder.
    pub fn is_mappable(&self) -> bool {
        self.is_valid() && !self.is_unknown()
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}
