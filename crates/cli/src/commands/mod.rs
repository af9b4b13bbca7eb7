//! Command implementations.

pub mod auth;
pub mod resources;

use freightdesk_admin::config::ConfigError;
use freightdesk_admin::graphql::{ApiClient, ApiError};
use freightdesk_admin::services::{AuthError, SessionService, StorageError};
use thiserror::Error;

use crate::storage::FileStorage;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Not signed in. Run `fd-cli login` first.")]
    NotSignedIn,

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// API client and the persisted session shared by every command.
pub struct Context {
    pub api: ApiClient,
    pub session: SessionService<FileStorage>,
}

impl Context {
    /// The stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NotSignedIn` when no token is stored.
    pub fn token(&self) -> Result<String, CommandError> {
        self.session.access_token().ok_or(CommandError::NotSignedIn)
    }

    /// Map an API failure, clearing the stored session when the backend no
    /// longer accepts its token.
    pub async fn api_failure(&self, error: ApiError) -> CommandError {
        if error.is_auth() {
            tracing::warn!(error = %error, "Backend rejected the stored session");
            if let Err(e) = self.session.reset().await {
                return e.into();
            }
            return CommandError::NotSignedIn;
        }
        error.into()
    }
}
