use thiserror::Error;

/// Errors returned by the tides client.
///
/// Some problems can be caught before anything is sent (`InvalidRequest`,
/// `UnknownValue`); the rest come back from the transport or the server.
#[derive(Debug, Error)]
pub enum TidesError {
    /// The request cannot be sent because the server would certainly reject it.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A string did not name any known value of an API enumeration.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NOAA API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// A well-formed request that the server answered with an error document.
    #[error("NOAA API error: {0}")]
    Api(String),

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response format: {0}")]
    Parse(String),
}

pub type Result<T, E = TidesError> = std::result::Result<T, E>;
