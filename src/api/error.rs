/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection failure, timeout, or unreadable response body
    #[error("request failed: {0}")]
    Transport(String),
    /// A status the endpoint does not answer with on success
    #[error("unexpected status code: {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// The service rejected the bearer token; the session has been cleared
    #[error("unauthorized")]
    Unauthorized,
    #[error("error decoding response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("error encoding request: {0}")]
    Encode(#[source] serde_json::Error),
}
