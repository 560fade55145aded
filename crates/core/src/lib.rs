//! Plaza Core - Shared types library.
//!
//! This crate provides common types used across all Plaza components:
//! - `api` - The public JSON API service
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, prices, roles,
//!   and slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
