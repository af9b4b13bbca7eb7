//! Authentication service.
//!
//! Exchanges credentials for a bearer token and keeps the session service in
//! sync with the backend's view of the user.

mod error;

pub use error::AuthError;

use freightdesk_core::{FieldErrors, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::graphql::documents::{
    self, LOGIN, LOGOUT, LoginData, LoginInput, LoginVariables, LogoutData, MeData, NoVariables,
    operation,
};
use crate::graphql::{ApiClient, ApiError};

use super::session::{SessionService, SessionStorage};

/// Sign-in form fields, in display order.
pub const SIGN_IN_FIELDS: &[&str] = &["email", "password"];

/// Authentication service.
pub struct AuthService<'a, S> {
    api: &'a ApiClient,
    session: &'a SessionService<S>,
}

impl<'a, S: SessionStorage> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a SessionService<S>) -> Self {
        Self { api, session }
    }

    /// Sign in and store the token and user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for empty or rejected fields,
    /// `AuthError::InvalidCredentials` if the backend refuses the pair, and
    /// `AuthError::Api` / `AuthError::Storage` for anything else.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = email.trim();
        let mut errors = FieldErrors::new();
        errors
            .required("email", "Email", email)
            .required("password", "Password", password.expose_secret());
        errors.into_result().map_err(AuthError::Validation)?;

        let body = documents::body(
            LOGIN,
            operation::LOGIN,
            LoginVariables {
                input: LoginInput {
                    email,
                    password: password.expose_secret(),
                },
            },
        );

        let data: LoginData = match self.api.execute(&body, None).await {
            Ok(data) => data,
            Err(ApiError::Unauthenticated(_)) => return Err(AuthError::InvalidCredentials),
            Err(ApiError::Validation { fields, .. }) => {
                return Err(AuthError::Validation(FieldErrors::from_backend(
                    fields,
                    SIGN_IN_FIELDS,
                )));
            }
            Err(e) => return Err(e.into()),
        };

        self.session.set_access_token(data.login.access_token).await?;
        self.session.set_user(Some(data.login.user.clone())).await?;
        tracing::info!(user_id = %data.login.user.id, "User signed in");

        Ok(data.login.user)
    }

    /// Sign out.
    ///
    /// The backend call revoking the token is best-effort; the local session
    /// is cleared either way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(token) = self.session.access_token() {
            let body = documents::body(LOGOUT, operation::LOGOUT, NoVariables {});
            if let Err(e) = self.api.execute::<_, LogoutData>(&body, Some(&token)).await {
                tracing::warn!(error = %e, "Backend logout failed, clearing session anyway");
            }
        }
        self.session.reset().await?;
        Ok(())
    }

    /// Re-read the user behind the current token.
    ///
    /// Returns `None` without calling the backend when no token is held. A
    /// token the backend no longer accepts resets the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the backend call fails; the session has
    /// already been reset when that error is authentication-class.
    #[instrument(skip(self))]
    pub async fn refresh_user(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.session.access_token() else {
            return Ok(None);
        };

        match self.api.execute::<_, MeData>(&documents::me(), Some(&token)).await {
            Ok(MeData { me: Some(user) }) => {
                self.session.set_user(Some(user.clone())).await?;
                Ok(Some(user))
            }
            Ok(MeData { me: None }) => {
                self.session.reset().await?;
                Ok(None)
            }
            Err(e) if e.is_auth() => {
                self.session.reset().await?;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
