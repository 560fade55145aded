//! Request gates placed before protected handlers.

pub mod auth;

pub use auth::{RequireAdmin, RequireAuth};
