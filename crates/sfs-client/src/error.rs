//! Client error types.

/// Errors raised while talking to the SFSControl HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The request never produced a response (connect, DNS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Reading the response body failed.
    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    /// The response body was not the JSON the endpoint promises.
    #[error("invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    /// Telemetry needed for a calculation was absent from the response.
    #[error("telemetry field `{0}` is missing")]
    MissingField(&'static str),
}

impl ClientError {
    pub(crate) fn from_ureq(url: &str, error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, _) => ClientError::Status {
                status,
                url: url.to_string(),
            },
            ureq::Error::Transport(transport) => ClientError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }
}
