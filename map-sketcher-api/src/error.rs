/// What a backend call can come back with. Both variants are recovered at the
/// view layer and shown as a timed notification; neither is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable response: unreachable host,
    /// aborted fetch, or a 2xx whose body wasn't the JSON we expected.
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-2xx status. `message` is the server's
    /// own `message` field when the body had one, else a per-operation
    /// fallback.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    /// The user-facing text, regardless of variant.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(text) => text,
            ApiError::Rejected { message, .. } => message,
        }
    }
}
