use thiserror::Error;

/// Custom error type for srvmon
#[derive(Error, Debug)]
pub enum SrvmonError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed telemetry: {0}")]
    MalformedTelemetry(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type alias for srvmon
pub type Result<T> = std::result::Result<T, SrvmonError>;

impl SrvmonError {
    /// Create a malformed telemetry error
    pub fn malformed_telemetry<S: Into<String>>(msg: S) -> Self {
        SrvmonError::MalformedTelemetry(msg.into())
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint<S: Into<String>>(msg: S) -> Self {
        SrvmonError::InvalidEndpoint(msg.into())
    }
}

/// Failure outcomes of the name resolution and geo lookup adapters.
///
/// None of these escape the location pipeline: each one is mapped to a
/// sentinel record, except `Cancelled` which produces no output at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("DNS resolution failed: {0}")]
    DnsFailed(String),

    #[error("Geo lookup failed: {0}")]
    GeoLookupFailed(String),

    #[error("Unexpected response shape: {0}")]
    ParseFailure(String),

    #[error("Resolution cancelled")]
    Cancelled,
}

impl ResolutionError {
    pub fn dns<S: Into<String>>(msg: S) -> Self {
        ResolutionError::DnsFailed(msg.into())
    }

    pub fn geo<S: Into<String>>(msg: S) -> Self {
        ResolutionError::GeoLookupFailed(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ResolutionError::ParseFailure(msg.into())
    }
}
