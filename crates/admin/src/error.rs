//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::graphql::ApiError;
use crate::services::{AuthError, StorageError};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// GraphQL API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] StorageError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Marks a response caused by the backend rejecting the session's token.
///
/// The `auth_failures` middleware turns such responses into a session reset
/// and a redirect to sign-in.
#[derive(Debug, Clone)]
pub struct AuthFailure {
    pub message: String,
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Api(e) => Self::Api(e),
            AuthError::Storage(e) => Self::Session(e),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Api(e) if e.is_auth() => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn is_server_fault(&self) -> bool {
        match self {
            Self::Api(e) => e.is_server_fault(),
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Api(e) if e.is_server_fault() => "External service error".to_string(),
            _ => self.to_string(),
        };

        let mut response = (status, message).into_response();
        if let Self::Api(e) = &self
            && e.is_auth()
        {
            response.extensions_mut().insert(AuthFailure {
                message: e.to_string(),
            });
        }
        response
    }
}

/// Set the Sentry user context from the signed-in user.
pub fn set_sentry_user(user: &freightdesk_core::User) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            email: Some(user.email.clone()),
            username: Some(user.name.clone()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
