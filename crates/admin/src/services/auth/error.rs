//! Authentication error types.

use freightdesk_core::FieldErrors;
use thiserror::Error;

use crate::graphql::ApiError;
use crate::services::session::StorageError;

/// Errors that can occur during sign-in, sign-out and user refresh.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair rejected by the backend.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Form input rejected locally or by the backend.
    #[error("invalid sign-in form")]
    Validation(FieldErrors),

    /// Backend call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}
