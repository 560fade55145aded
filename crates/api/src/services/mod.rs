//! Business services.
//!
//! - [`auth`] - password hashing and registration/login
//! - [`token`] - signed session token issuance and verification
//! - [`catalog`] - catalog mutation pipeline and query surface

pub mod auth;
pub mod catalog;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService, ProductDraft};
pub use token::{TokenError, TokenService};
