//! Domain types for the API.
//!
//! These are validated domain objects, separate from the wire shapes in
//! `routes` and from whatever a store backend persists.

pub mod product;
pub mod user;

pub use product::{Category, Image, Product, ProductSummary};
pub use user::{User, UserProfile};
