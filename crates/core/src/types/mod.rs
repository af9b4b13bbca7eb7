//! Core types for FreightDesk.
//!
//! This module provides type-safe wrappers for backend identifiers.

pub mod id;

pub use id::*;
