//! Business logic services for admin.
//!
//! # Services
//!
//! - `session` - Session state mirrored into durable storage
//! - `auth` - Sign-in, sign-out and user refresh against the GraphQL API
//! - `crud` - Generic list/get/create/update/delete for every resource
//! - `toast` - Notifications queued across redirects

pub mod auth;
pub mod crud;
pub mod session;
pub mod toast;

pub use auth::{AuthError, AuthService};
pub use crud::CrudService;
pub use session::{SessionService, SessionStorage, StorageError};
pub use toast::{Toast, ToastKind};
