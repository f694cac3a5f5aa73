//! Custom error types for the authentication service

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors returned to HTTP clients as plain text
#[derive(Error, Debug)]
pub enum AuthError {
    /// Endpoint only accepts POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Unknown phone number or wrong password; the two are not distinguished
    #[error("Invalid phone number or password")]
    Unauthorized,

    /// Hashing, store or session failure
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut response = (status, self.to_string()).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}

/// Type alias for handler results
pub type AuthResult<T> = Result<T, AuthError>;
