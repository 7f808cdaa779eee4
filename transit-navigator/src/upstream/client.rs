//! Transit API HTTP client.
//!
//! Provides async methods for querying the transit JSON API. Handles
//! authentication, bounded concurrency and status-code mapping.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{StopKey, format_upstream_time};

use super::error::UpstreamError;
use super::source::{StopQuery, TransitSource};
use super::types::{StopResponse, StopScheduleResponse, StopsResponse, TripsResponse};

/// Default base URL for the transit API.
const DEFAULT_BASE_URL: &str = "https://api.winnipegtransit.com/v4";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// API key, sent as the `api-key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Transit API client.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// limit.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl TransitClient {
    /// Create a new transit client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// GET `{base_url}/{path}` and parse the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| UpstreamError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?params, "transit API request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("api-key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(UpstreamError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::json(e, &body))
    }
}

/// Query parameters for `stops.json`.
fn stop_query_params(query: &StopQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(5);
    if let Some(name) = &query.name {
        params.push(("name", name.clone()));
    }
    if let Some(route) = &query.route {
        params.push(("route", route.clone()));
    }
    params.push(("lat", query.near.latitude.to_string()));
    params.push(("lon", query.near.longitude.to_string()));
    params.push(("distance", query.distance.to_string()));
    params
}

impl TransitSource for TransitClient {
    async fn stops(&self, query: &StopQuery) -> Result<StopsResponse, UpstreamError> {
        self.get_json("stops.json", &stop_query_params(query)).await
    }

    async fn stop(&self, key: StopKey) -> Result<StopResponse, UpstreamError> {
        self.get_json(&format!("stops/{key}.json"), &[]).await
    }

    async fn stop_schedule(
        &self,
        key: StopKey,
        max_results_per_route: u8,
        start: NaiveDateTime,
    ) -> Result<StopScheduleResponse, UpstreamError> {
        self.get_json(
            &format!("stops/{key}/schedule.json"),
            &[
                ("max-results-per-route", max_results_per_route.to_string()),
                ("start", format_upstream_time(&start)),
            ],
        )
        .await
    }

    async fn trips(
        &self,
        origin: StopKey,
        destination: StopKey,
    ) -> Result<TripsResponse, UpstreamError> {
        self.get_json(
            "trips.json",
            &[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
            ],
        )
        .await
    }
}
