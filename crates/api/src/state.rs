//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::{CategoryStore, ProductStore, UserStore};
use crate::services::TokenService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration, the token service
/// (carrying the process-wide signing key), and the store trait objects.
/// There is no other cross-request mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    tokens: TokenService,
}

impl AppState {
    /// Create application state over a store backend that implements all
    /// three store traits.
    #[must_use]
    pub fn new<S>(config: ApiConfig, store: Arc<S>) -> Self
    where
        S: UserStore + ProductStore + CategoryStore + 'static,
    {
        let tokens = TokenService::new(&config.token_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users: store.clone(),
                products: store.clone(),
                categories: store,
                tokens,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> Arc<dyn UserStore> {
        self.inner.users.clone()
    }

    /// Get the product store.
    #[must_use]
    pub fn products(&self) -> Arc<dyn ProductStore> {
        self.inner.products.clone()
    }

    /// Get the category store.
    #[must_use]
    pub fn categories(&self) -> Arc<dyn CategoryStore> {
        self.inner.categories.clone()
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
