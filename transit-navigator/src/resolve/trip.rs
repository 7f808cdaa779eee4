use tracing::{debug, warn};

use crate::domain::{StopKey, TripPlan};
use crate::upstream::{TransitSource, convert_first_trip};

use super::Navigator;

impl<S: TransitSource> Navigator<S> {
    /// Plan a trip between two stops.
    ///
    /// Returns `None` when upstream offers no itinerary or the fetch fails.
    /// When it offers several, only the first is used.
    pub async fn plan(&self, origin: StopKey, destination: StopKey) -> Option<TripPlan> {
        let response = match self.source.trips(origin, destination).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%origin, %destination, error = %e, "trip fetch failed");
                return None;
            }
        };

        let plan = convert_first_trip(&response.trips);
        debug!(
            %origin,
            %destination,
            itineraries = response.trips.len(),
            segments = plan.as_ref().map(|p| p.segments.len()),
            "planned trip"
        );
        plan
    }
}
