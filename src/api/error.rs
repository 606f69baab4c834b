use thiserror::Error;

/// User-facing failure taxonomy. Every failure path maps to one of these, and
/// each carries a complete, displayable message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// A local precondition failed; nothing was sent over the network.
    #[error("{0}")]
    Validation(String),
    /// No response was received from the backend.
    #[error("No response from server. Check connection and backend URL ({0}).")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// A client-side failure that is neither of the above.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Classify a non-2xx response. Prefers a server-supplied `detail`
    /// message, then the canonical status text, then a generic fallback.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(|detail| detail.as_str().map(str::to_string))
            });
        let message = detail
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("Server responded with status {}", status.as_u16()));
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// Classify a transport failure from reqwest.
    pub(crate) fn from_transport(error: &reqwest::Error, backend_url: &str) -> Self {
        if error.is_connect() || error.is_timeout() {
            ApiError::Network(backend_url.to_string())
        } else {
            ApiError::Unknown(error.to_string())
        }
    }
}
