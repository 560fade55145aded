//! Store abstraction consumed by the services.
//!
//! Persistence is an external collaborator: the services only see these
//! traits. [`memory::MemoryStore`] is the reference backend the binary and
//! the tests run against; a database-backed repository would implement the
//! same traits.

pub mod memory;

use async_trait::async_trait;

use plaza_core::{CategoryId, Email, Price, ProductId, Slug, UserId};

use crate::models::{Category, Product, User};

/// Errors surfaced by a store backend.
///
/// Opaque to API clients: every variant maps to a generic server failure and
/// is logged internally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store backend failure: {0}")]
    Backend(String),
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Persisted data no longer satisfies an invariant.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// User persistence operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact email.
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// Look up a user by ID.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Insert a new user.
    ///
    /// Returns [`StoreError::Conflict`] when the email is already taken.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
}

/// Category persistence operations.
///
/// Categories are owned externally; the API only reads them and, in the
/// in-memory backend, seeds them for tests and demos.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Look up a category by ID.
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Insert a category.
    async fn insert_category(&self, category: Category) -> Result<Category, StoreError>;
}

/// Product persistence operations.
///
/// Listing methods return products newest-first by creation time.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product.
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;

    /// Look up a product by ID.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Look up a product by slug.
    async fn find_product_by_slug(&self, slug: &Slug) -> Result<Option<Product>, StoreError>;

    /// Replace a product by its ID. Returns the stored product, or `None`
    /// when the ID does not resolve.
    async fn update_product(&self, product: Product) -> Result<Option<Product>, StoreError>;

    /// Delete a product by ID, returning the deleted product if it existed.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Products newest-first, skipping `skip` entries, capped at `limit`
    /// when given.
    async fn products_newest_first(
        &self,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Product>, StoreError>;

    /// Products restricted to the given categories and inclusive price
    /// range. Empty categories / `None` range mean "no restriction"; the two
    /// restrictions compose with AND.
    async fn products_filtered(
        &self,
        categories: &[CategoryId],
        price_range: Option<(Price, Price)>,
    ) -> Result<Vec<Product>, StoreError>;

    /// Case-insensitive substring match over name or description.
    async fn products_matching(&self, keyword: &str) -> Result<Vec<Product>, StoreError>;

    /// Products in `category` other than `exclude`, capped at `limit`.
    async fn products_related(
        &self,
        exclude: ProductId,
        category: CategoryId,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError>;

    /// Total product count. Backends may return a cheap estimate.
    async fn estimated_product_count(&self) -> Result<u64, StoreError>;
}
