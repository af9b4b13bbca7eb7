//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. `auth_failures` (reset session when the backend rejects the token)
//! 5. Route guards (`require_auth` / `public_only`) per route group

pub mod auth;
pub mod session;

pub use auth::{
    CurrentSession, RequestSession, RequireAuth, auth_failures, public_only, require_auth,
};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
