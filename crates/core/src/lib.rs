//! FreightDesk Core - Shared types library.
//!
//! This crate provides the pieces shared by every FreightDesk component:
//! - `admin` - Server-rendered administration panel
//! - `cli` - Terminal client for the same GraphQL backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP clients,
//! no clocks. Time is always passed in by the caller so the table and session
//! logic stays deterministic under test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for opaque backend IDs
//! - [`session`] - Session and user read model
//! - [`guard`] - Route access decisions
//! - [`dialog`] - Per-feature dialog state machine
//! - [`pagination`] - Paginator info and the page-number window
//! - [`table`] - URL-synchronized table state
//! - [`validation`] - Form field error mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dialog;
pub mod guard;
pub mod pagination;
pub mod session;
pub mod table;
pub mod types;
pub mod validation;

pub use dialog::{DialogKind, DialogState};
pub use guard::{GuardOutcome, RouteAccess};
pub use pagination::{PageItem, Paginated, PaginatorInfo, page_count, page_window};
pub use session::{Permission, Role, Session, User};
pub use types::*;
pub use validation::FieldErrors;
