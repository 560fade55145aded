//! In-memory store backend.
//!
//! Backs the binary and the test suites. Products are kept in insertion
//! order, which equals creation order, so "newest first" is a reverse scan
//! with no timestamp tie-breaking.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use plaza_core::{CategoryId, Email, Price, ProductId, Slug, UserId};

use super::{CategoryStore, ProductStore, StoreError, UserStore};
use crate::models::{Category, Product, User};

/// In-memory reference implementation of the store traits.
///
/// Interior locking only; methods never hold a lock across an await point,
/// so the store is safe to share across concurrent requests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    products: RwLock<Vec<Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category, returning its ID.
    ///
    /// Categories are owned outside this core; this is the hook for the
    /// binary and tests to create them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the store lock is poisoned.
    pub fn seed_category(&self, name: &str) -> Result<CategoryId, StoreError> {
        let category = Category {
            id: CategoryId::generate(),
            name: name.to_owned(),
            slug: Slug::from_name(name),
        };
        let id = category.id;
        self.categories
            .write()
            .map_err(|_| poisoned())?
            .insert(id, category);
        Ok(id)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".into())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let categories = self.categories.read().map_err(|_| poisoned())?;
        Ok(categories.get(&id).cloned())
    }

    async fn insert_category(&self, category: Category) -> Result<Category, StoreError> {
        let mut categories = self.categories.write().map_err(|_| poisoned())?;
        categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_slug(&self, slug: &Slug) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.iter().find(|p| &p.slug == slug).cloned())
    }

    async fn update_product(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let position = products.iter().position(|p| p.id == id);
        Ok(position.map(|i| products.remove(i)))
    }

    async fn products_newest_first(
        &self,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let iter = products.iter().rev().skip(skip);
        Ok(match limit {
            Some(n) => iter.take(n).cloned().collect(),
            None => iter.cloned().collect(),
        })
    }

    async fn products_filtered(
        &self,
        categories: &[CategoryId],
        price_range: Option<(Price, Price)>,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .rev()
            .filter(|p| categories.is_empty() || categories.contains(&p.category))
            .filter(|p| price_range.is_none_or(|(min, max)| p.price >= min && p.price <= max))
            .cloned()
            .collect())
    }

    async fn products_matching(&self, keyword: &str) -> Result<Vec<Product>, StoreError> {
        let needle = keyword.to_lowercase();
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .rev()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn products_related(
        &self,
        exclude: ProductId,
        category: CategoryId,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .rev()
            .filter(|p| p.category == category && p.id != exclude)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn estimated_product_count(&self) -> Result<u64, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.len() as u64)
    }
}
