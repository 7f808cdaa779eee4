//! Upstream client error types.

/// Errors from talking to the transit API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rejected API key
    #[error("unauthorized: check TRANSIT_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by transit API")]
    RateLimited,

    /// Requested stop or resource does not exist
    #[error("not found")]
    NotFound,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not the JSON shape we expected
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Fixture data could not be loaded
    #[error("fixture error: {message}")]
    Fixture { message: String },
}

impl UpstreamError {
    /// Build a JSON error, keeping a prefix of the offending body for logs.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        UpstreamError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
