//! FreightDesk Admin library.
//!
//! Server-rendered administration panel for the FreightDesk logistics
//! backend. Every screen talks to the backend's GraphQL API with the signed-in
//! user's bearer token; the panel keeps no data of its own besides the
//! session.
//!
//! The crate is a library so the binary and the integration tests share one
//! router, and the CLI reuses the API client and resource definitions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod graphql;
pub mod middleware;
pub mod resources;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{Router, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{auth_failures, create_session_layer};
use crate::state::AppState;

/// Default directory served under `/static`, independent of the working
/// directory the binary starts in.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full application: routes, guards, session, tracing and Sentry.
///
/// Layers run outermost first: Sentry, tracing, session, then the handler
/// for auth failures so it sees the session the guards loaded.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .layer(from_fn(auth_failures))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
