use forum_core::{ErrorKind, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForumClientError {
    // Сетевые ошибки (ответа нет)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Ошибки ответа сервера
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found")]
    NotFound,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    // Ошибки на стороне клиента
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ForumClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumClientError::HttpError(_) => ErrorKind::Network,
            ForumClientError::Unauthorized(_) => ErrorKind::Http(401),
            ForumClientError::Forbidden(_) => ErrorKind::Http(403),
            ForumClientError::NotFound => ErrorKind::Http(404),
            ForumClientError::Status { status, .. } => ErrorKind::from_status(*status),
            ForumClientError::Validation(_)
            | ForumClientError::SerializationError(_)
            | ForumClientError::InvalidUrl(_)
            | ForumClientError::Config(_) => ErrorKind::Client,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ForumClientError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ForumClientError::Unauthorized(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ForumClientError::Forbidden(_))
    }
}

impl From<serde_json::Error> for ForumClientError {
    fn from(err: serde_json::Error) -> Self {
        ForumClientError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(ForumClientError::NotFound.kind(), ErrorKind::Http(404));
        assert!(ForumClientError::Unauthorized("expired".into()).kind().is_unauthorized());
        assert_eq!(
            ForumClientError::from(ValidationError::EmptyContent).kind(),
            ErrorKind::Client
        );
        assert_eq!(
            ForumClientError::Status {
                status: 500,
                message: "boom".into()
            }
            .to_string(),
            "HTTP 500: boom"
        );
    }
}
