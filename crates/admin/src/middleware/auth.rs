//! Authentication middleware and extractors for admin.
//!
//! Route guards run once per request, before the handler: protected routes
//! send anonymous users to sign-in with a `redirect` back to where they were
//! going, and public-only routes send signed-in users away.

use axum::{
    extract::{FromRequestParts, Request},
    http::{Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use freightdesk_core::guard::{self, GuardOutcome, REDIRECT_PARAM, RouteAccess};
use freightdesk_core::table::SearchParams;
use freightdesk_core::User;
use tower_sessions::Session;

use crate::error::{AppError, AuthFailure, clear_sentry_user, set_sentry_user};
use crate::services::session::SessionService;
use crate::services::toast::{self, Toast};

/// Session service bound to the request's server-side session.
pub type RequestSession = SessionService<Session>;

/// Extractor loading the session service for this request.
pub struct CurrentSession(pub RequestSession);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self(SessionService::load(session).await?))
    }
}

/// Extractor that requires an authenticated user.
///
/// Routes behind [`require_auth`] never see the rejection; it covers
/// handlers mounted without the guard.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireAuth {
    pub session: RequestSession,
    pub user: User,
    pub token: String,
}

/// Error returned when authentication is required but the user is not signed in.
pub enum AuthRejection {
    /// Redirect to sign-in, returning to the given location.
    RedirectToSignIn(String),
    /// Session could not be loaded.
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn(location) => {
                Redirect::to(&guard::sign_in_location(Some(&location))).into_response()
            }
            Self::Error(e) => e.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Error)?;

        let current = session.session();
        match (current.user, current.access_token) {
            (Some(user), token) => Ok(Self {
                session,
                user,
                token,
            }),
            (None, _) => Err(AuthRejection::RedirectToSignIn(location(&parts.uri))),
        }
    }
}

/// Guard for routes that require a signed-in user.
pub async fn require_auth(
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    run_guard(RouteAccess::Protected, &session, request, next).await
}

/// Guard for routes only anonymous users may see (sign-in).
pub async fn public_only(
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    run_guard(RouteAccess::PublicOnly, &session, request, next).await
}

async fn run_guard(
    access: RouteAccess,
    session: &RequestSession,
    request: Request,
    next: Next,
) -> Response {
    let location = location(request.uri());
    let params = SearchParams::parse(request.uri().query().unwrap_or_default());
    let outcome = guard::evaluate(
        access,
        session.is_authenticated(),
        &location,
        params.get(REDIRECT_PARAM),
    );

    match outcome {
        GuardOutcome::Proceed => {
            if let Some(user) = &session.session().user {
                set_sentry_user(user);
            }
            next.run(request).await
        }
        GuardOutcome::RedirectToSignIn { .. } | GuardOutcome::RedirectAway { .. } => {
            tracing::debug!(?outcome, "Guard redirect");
            let target = outcome.location().unwrap_or_else(|| guard::HOME_PATH.to_string());
            Redirect::to(&target).into_response()
        }
    }
}

/// Reset the session when the backend rejected its token.
///
/// Handlers return [`AppError::Api`] for authentication-class errors, which
/// tags the response with [`AuthFailure`]. This middleware clears the
/// session, queues a toast and sends the browser back to the page it asked
/// for, where the route guard takes over.
pub async fn auth_failures(request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let method = request.method().clone();
    let location = location(request.uri());

    let response = next.run(request).await;
    let Some(failure) = response.extensions().get::<AuthFailure>().cloned() else {
        return response;
    };

    tracing::warn!(reason = %failure.message, "Backend rejected session, signing out");
    clear_sentry_user();

    if let Some(session) = session {
        match SessionService::load(session.clone()).await {
            Ok(service) => {
                if let Err(e) = service.reset().await {
                    tracing::error!(error = %e, "Failed to reset session");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to load session for reset"),
        }
        let toast = Toast::error("Your session has expired. Please sign in again.");
        if let Err(e) = toast::push(&session, toast).await {
            tracing::warn!(error = %e, "Failed to queue toast");
        }
    }

    let target = if method == Method::GET {
        location
    } else {
        guard::SIGN_IN_PATH.to_string()
    };
    Redirect::to(&target).into_response()
}

/// Path and query of a request URI.
fn location(uri: &axum::http::Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}
