//! Error types for the chat gateway
//!
//! Provides unified error handling using thiserror. Only authentication,
//! validation and upstream failures ever reach the caller; the messages
//! returned to the user are the localized generic ones.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Localized message for 401 responses.
pub const UNAUTHORIZED_MESSAGE: &str = "Non autorisé";

/// Localized message for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erreur interne du serveur";

// == Chat Error Enum ==
/// Unified error type for the chat gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Session check against the persistence backend failed
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed or missing input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote service answered with a non-success status or an unusable body
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Overall deadline elapsed while a remote call was outstanding
    #[error("Upstream call timed out")]
    Timeout,

    /// Transport-level failure talking to a remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Write to the conversation store failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// HTTP status surfaced for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
            ChatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Network(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ChatError::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
            ChatError::InvalidRequest(msg) => msg.clone(),
            other => {
                // Upstream details stay in the logs
                error!("Chat request failed: {}", other);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chat gateway.
pub type Result<T> = std::result::Result<T, ChatError>;
