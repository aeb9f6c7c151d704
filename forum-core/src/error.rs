use thiserror::Error;

/// Coarse classification shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response reached the client.
    Network,
    /// The server answered with a non-success status.
    Http(u16),
    /// Raised on the client before or after the exchange (validation, decoding).
    Client,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        ErrorKind::Http(status)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ErrorKind::Http(401))
    }
}

/// Rejections raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Content must not be empty")]
    EmptyContent,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("You must be logged in to do that")]
    NotAuthenticated,

    #[error("Unsupported action: {0}")]
    Unsupported(String),
}
