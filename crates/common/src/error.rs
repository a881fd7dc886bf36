//! Error types for the YouMatter client.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Local Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // === Remote Errors ===
    #[error("Session expired")]
    Unauthorized,

    #[error("{message}")]
    RateLimited {
        message: String,
        /// Seconds the server asked us to back off, when provided.
        retry_after: Option<u64>,
    },

    #[error("{0}")]
    DuplicateSubmission(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),
}

impl AppError {
    /// Returns a short machine-readable code for this error, used in logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::DuplicateSubmission(_) => "DUPLICATE_SUBMISSION",
            Self::Api { .. } => "API_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Returns whether this error was produced without issuing a network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Forbidden(_) | Self::Config(_)
        )
    }

    /// Returns the message a view should surface for this error.
    ///
    /// Server-provided messages pass through unchanged; transport failures
    /// fall back to the given generic message so exception details never
    /// reach the user.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Transport(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = AppError::Api {
            status: 400,
            message: "Comment message is required.".to_string(),
        };
        assert_eq!(
            err.user_message("Unable to submit complaint"),
            "Comment message is required."
        );
    }

    #[test]
    fn test_user_message_hides_transport_detail() {
        let err = AppError::Transport("connection refused (os error 111)".to_string());
        assert_eq!(
            err.user_message("Unable to submit complaint"),
            "Unable to submit complaint"
        );
    }

    #[test]
    fn test_local_errors_never_reach_the_network() {
        assert!(AppError::Validation("bad".into()).is_local());
        assert!(AppError::Forbidden("no permission".into()).is_local());
        assert!(!AppError::Unauthorized.is_local());
    }
}
