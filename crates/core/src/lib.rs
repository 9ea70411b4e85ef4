//! commerce-fields core - Shared types library.
//!
//! This crate provides the types shared by every commerce-fields component:
//! - `server` - HTTP service backing the admin-panel pickers
//! - `cli` - Command-line access to the same catalog operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - ID newtypes, picker option DTOs, and custom field values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
