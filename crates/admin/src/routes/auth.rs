//! Sign-in and sign-out.
//!
//! Credentials are exchanged for a bearer token through the `login`
//! mutation; the token and user live in the server-side session.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use freightdesk_core::FieldErrors;
use freightdesk_core::guard::{self, HOME_PATH, SIGN_IN_PATH};
use freightdesk_core::validation::GENERAL;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::components::layout::LayoutView;
use crate::components::{FieldKind, FormField, FormValues, FormView};
use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::{CurrentSession, RequestSession, RequireAuth};
use crate::services::toast::{self, Toast};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

const SIGN_IN_FORM: &[FormField] = &[
    FormField::text("email", "Email")
        .kind(FieldKind::Email)
        .required()
        .placeholder("you@company.com"),
    FormField::text("password", "Password")
        .kind(FieldKind::Password)
        .required(),
];

#[derive(Template)]
#[template(path = "sign_in.html")]
struct SignInTemplate {
    layout: LayoutView,
    form: FormView,
    redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignInQuery {
    redirect: Option<String>,
}

#[derive(Deserialize)]
struct SignInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    redirect: Option<String>,
}

/// Routes only anonymous users reach.
pub fn public_router() -> Router<AppState> {
    Router::new().route(SIGN_IN_PATH, get(sign_in_page).post(sign_in))
}

/// Routes that need a signed-in user.
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/sign-out", post(sign_out))
}

/// GET /sign-in
#[instrument(skip(session))]
async fn sign_in_page(
    CurrentSession(session): CurrentSession,
    Query(query): Query<SignInQuery>,
) -> Result<Response, AppError> {
    render(&session, &FormValues::new(), query.redirect, &FieldErrors::new(), StatusCode::OK).await
}

/// POST /sign-in
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn sign_in(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<SignInForm>,
) -> Result<Response, AppError> {
    let password = SecretString::from(form.password);
    let auth = AuthService::new(state.api(), &session);

    let mut values = FormValues::new();
    values.insert("email".to_string(), form.email.clone());

    let (errors, status) = match auth.login(&form.email, &password).await {
        Ok(user) => {
            toast::push(session.storage(), Toast::success(format!("Welcome back, {}.", user.name)))
                .await?;
            let target = form
                .redirect
                .as_deref()
                .and_then(guard::sanitize_redirect)
                .unwrap_or(HOME_PATH);
            return Ok(Redirect::to(target).into_response());
        }
        Err(AuthError::Validation(errors)) => (errors, StatusCode::UNPROCESSABLE_ENTITY),
        Err(AuthError::InvalidCredentials) => {
            let mut errors = FieldErrors::new();
            errors.add(GENERAL, "Invalid email or password.");
            (errors, StatusCode::UNAUTHORIZED)
        }
        Err(AuthError::Api(e)) => {
            tracing::error!(error = %e, "Sign-in request failed");
            toast::push(
                session.storage(),
                Toast::error("Sign-in is unavailable right now. Please try again."),
            )
            .await?;
            (FieldErrors::new(), StatusCode::BAD_GATEWAY)
        }
        Err(AuthError::Storage(e)) => return Err(e.into()),
    };

    render(&session, &values, form.redirect, &errors, status).await
}

/// POST /sign-out
#[instrument(skip_all, fields(user_id = %auth.user.id))]
async fn sign_out(State(state): State<AppState>, auth: RequireAuth) -> Result<Response, AppError> {
    AuthService::new(state.api(), &auth.session)
        .logout()
        .await?;
    clear_sentry_user();

    toast::push(auth.session.storage(), Toast::info("You have been signed out.")).await?;
    Ok(Redirect::to(SIGN_IN_PATH).into_response())
}

async fn render(
    session: &RequestSession,
    values: &FormValues,
    redirect: Option<String>,
    errors: &FieldErrors,
    status: StatusCode,
) -> Result<Response, AppError> {
    let redirect = redirect.filter(|r| guard::sanitize_redirect(r).is_some());
    let template = SignInTemplate {
        layout: LayoutView::new(None, SIGN_IN_PATH, toast::take(session.storage()).await),
        form: FormView::build(SIGN_IN_FORM, SIGN_IN_PATH, "Sign in", values, errors),
        redirect,
    };
    Ok((status, Html(template.render()?)).into_response())
}
