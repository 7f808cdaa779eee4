use tracing::{debug, warn};

use crate::domain::{Coordinate, Stop, retain_mappable};
use crate::geolocation::{Located, PositionOptions, PositionSource, locate};
use crate::upstream::{StopQuery, TransitSource, normalize_stops};

use super::Navigator;

impl<S: TransitSource> Navigator<S> {
    /// Stops within `radius_m` metres of `at`, in upstream order.
    ///
    /// Upstream failure yields an empty list.
    pub async fn nearby(&self, at: Coordinate, radius_m: u32) -> Vec<Stop> {
        match self.source.stops(&StopQuery::near(at, radius_m)).await {
            Ok(response) => {
                let stops = normalize_stops(&response.stops);
                debug!(%at, radius_m, found = stops.len(), "nearby stops");
                stops
            }
            Err(e) => {
                warn!(%at, radius_m, error = %e, "nearby stop fetch failed");
                Vec::new()
            }
        }
    }

    /// Stops to draw as map markers around `at`, within `radius_m` or the
    /// configured map radius.
    pub async fn map_stops(&self, at: Coordinate, radius_m: Option<u32>) -> Vec<Stop> {
        let radius_m = radius_m.unwrap_or(self.config.map_radius_m);
        retain_mappable(self.nearby(at, radius_m).await)
    }

    /// Locate the rider, then list the stops around them.
    ///
    /// When no fix is available the stops are listed around the fallback
    /// centre instead, and [`Located::fallback_reason`] says why.
    pub async fn nearby_user<P: PositionSource>(&self, positions: &P) -> (Located, Vec<Stop>) {
        let options = PositionOptions::default().with_timeout(self.config.geolocation_timeout);
        let located = locate(positions, &options, self.config.fallback_centre).await;
        let stops = self
            .nearby(located.coordinate, self.config.locate_radius_m)
            .await;
        (located, stops)
    }
}
