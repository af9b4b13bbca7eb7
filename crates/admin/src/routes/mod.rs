//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the API)
//!
//! # Auth (public only)
//! GET  /sign-in                    - Sign-in page
//! POST /sign-in                    - Submit credentials
//!
//! # Everything below requires a signed-in user
//! POST /sign-out                   - Sign out
//! GET  /                           - Dashboard overview
//!
//! # One block per resource (branches, currencies, fleet-types, positions)
//! GET  /{plural}                   - Table; `dialog`/`id` open a dialog
//! POST /{plural}                   - Create
//! POST /{plural}/bulk-delete       - Delete the selected rows
//! POST /{plural}/{id}              - Update
//! POST /{plural}/{id}/delete       - Delete one row
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod resources;

use axum::{Router, middleware::from_fn};

use crate::middleware::{public_only, require_auth};
use crate::resources::{Branch, Currency, FleetType, Position};
use crate::state::AppState;

/// Build every route with its guard applied.
pub fn routes() -> Router<AppState> {
    let public_only_routes = auth::public_router().route_layer(from_fn(public_only));

    let protected_routes = Router::new()
        .merge(auth::protected_router())
        .merge(dashboard::router())
        .merge(resources::router::<Branch>())
        .merge(resources::router::<Currency>())
        .merge(resources::router::<FleetType>())
        .merge(resources::router::<Position>())
        .route_layer(from_fn(require_auth));

    Router::new()
        .merge(health::router())
        .merge(public_only_routes)
        .merge(protected_routes)
}
