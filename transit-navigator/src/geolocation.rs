//! One-shot rider positioning.
//!
//! A position request either yields a coordinate or a reason it could not.
//! [`locate`] bounds the wait and turns any failure into a fallback
//! coordinate so callers always have somewhere to centre on.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Coordinate;

/// Why no position fix was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// Options for a position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix the device can give.
    pub high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(6),
        }
    }
}

impl PositionOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Something that can report where the rider is.
pub trait PositionSource: Send + Sync {
    /// Request a single position fix.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Outcome of [`locate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub coordinate: Coordinate,
    /// Set when `coordinate` is the fallback rather than a fix.
    pub fallback_reason: Option<GeolocationError>,
}

impl Located {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Request one position fix, falling back on any failure.
///
/// The source is given `options.timeout` to answer; past that the request
/// is abandoned and resolves as [`GeolocationError::Timeout`]. A fix outside
/// valid latitude/longitude ranges counts as unavailable.
pub async fn locate<P: PositionSource>(
    source: &P,
    options: &PositionOptions,
    fallback: Coordinate,
) -> Located {
    let result = match tokio::time::timeout(options.timeout, source.current_position(options)).await
    {
        Ok(Ok(coordinate)) if coordinate.is_valid() => Ok(coordinate),
        Ok(Ok(coordinate)) => Err(GeolocationError::Unavailable(format!(
            "invalid position {coordinate}"
        ))),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GeolocationError::Timeout),
    };

    match result {
        Ok(coordinate) => {
            debug!(%coordinate, "position fix");
            Located {
                coordinate,
                fallback_reason: None,
            }
        }
        Err(reason) => {
            warn!(error = %reason, %fallback, "no position fix, using fallback");
            Located {
                coordinate: fallback,
                fallback_reason: Some(reason),
            }
        }
    }
}

/// A position source with a scripted answer.
///
/// Stands in for a device when running headless or under test.
#[derive(Debug, Clone)]
pub struct FixedPosition {
    answer: Result<Coordinate, GeolocationError>,
    delay: Duration,
}

impl FixedPosition {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            answer: Ok(coordinate),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(error: GeolocationError) -> Self {
        Self {
            answer: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl PositionSource for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.clone()
    }
}
