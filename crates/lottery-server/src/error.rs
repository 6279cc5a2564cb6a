//! Server error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lottery_core::{CodecError, ProtocolError};
use serde::Serialize;
use thiserror::Error;

/// Structured error response for API clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[error("Claim token error: {0}")]
    Token(#[from] CodecError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the error code for structured responses
    fn code(&self) -> &'static str {
        match self {
            ServerError::Protocol(ProtocolError::WrongIdentity) => "WRONG_IDENTITY",
            ServerError::Protocol(ProtocolError::NoActiveClaim) => "NO_ACTIVE_CLAIM",
            ServerError::Protocol(ProtocolError::UnknownName) => "UNKNOWN_NAME",
            ServerError::Token(_) => "TOKEN_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Protocol(ProtocolError::WrongIdentity) => StatusCode::FORBIDDEN,
            ServerError::Protocol(ProtocolError::NoActiveClaim) => StatusCode::UNAUTHORIZED,
            ServerError::Protocol(ProtocolError::UnknownName) => StatusCode::NOT_FOUND,
            ServerError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
