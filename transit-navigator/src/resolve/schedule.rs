use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::{Stop, StopKey, StopSchedule};
use crate::upstream::{TransitSource, convert_stop_schedule, normalize_stop};

use super::Navigator;

impl<S: TransitSource> Navigator<S> {
    /// A single stop. Failure or an unusable record yields `None`.
    pub async fn stop(&self, key: StopKey) -> Option<Stop> {
        match self.source.stop(key).await {
            Ok(response) => response.stop.as_ref().and_then(normalize_stop),
            Err(e) => {
                warn!(%key, error = %e, "stop fetch failed");
                None
            }
        }
    }

    /// Upcoming departures at a stop, from now.
    pub async fn schedule(&self, key: StopKey) -> Option<StopSchedule> {
        self.schedule_at(key, Local::now().naive_local()).await
    }

    /// Upcoming departures at a stop, from `start`.
    ///
    /// If the schedule comes back without its stop record, the stop is
    /// looked up separately.
    pub async fn schedule_at(&self, key: StopKey, start: NaiveDateTime) -> Option<StopSchedule> {
        let response = match self
            .source
            .stop_schedule(key, self.config.schedule_results_per_route, start)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(%key, error = %e, "stop schedule fetch failed");
                return None;
            }
        };

        let Some(raw) = response.stop_schedule else {
            warn!(%key, "stop schedule response has no schedule");
            return None;
        };

        let fallback = match raw.stop.as_ref().and_then(normalize_stop) {
            Some(_) => None,
            None => self.stop(key).await,
        };

        let schedule = convert_stop_schedule(&raw, fallback.as_ref());
        debug!(
            %key,
            routes = schedule.as_ref().map(|s| s.routes.routes().len()),
            "stop schedule"
        );
        schedule
    }
}
