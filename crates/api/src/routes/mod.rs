//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Health check
//!
//! # Auth
//! POST /api/auth/register                        - Register, returns token
//! POST /api/auth/login                           - Login, returns token
//! GET  /api/auth/check                           - Requires valid token
//! GET  /api/auth/admin-check                     - Requires admin token
//!
//! # Catalog (mutations require admin token)
//! POST   /api/products                           - Create (multipart)
//! GET    /api/products                           - Newest twelve
//! GET    /api/products/slug/{slug}               - Read by slug
//! PUT    /api/products/{id}                      - Update (multipart)
//! DELETE /api/products/{id}                      - Delete
//! GET    /api/products/{id}/image                - Image bytes (204 if none)
//! POST   /api/products/filtered                  - Category/price filter
//! GET    /api/products/count                     - Total count
//! GET    /api/products/page/{page}               - Page of two, 1-based
//! GET    /api/products/search/{keyword}          - Keyword search
//! GET    /api/products/related/{product_id}/{category_id} - Related, max 3
//! ```

pub mod auth;
pub mod products;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/check", get(auth::auth_check))
        .route("/admin-check", get(auth::admin_check))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::list))
        .route("/slug/{slug}", get(products::read))
        .route("/{id}", put(products::update).delete(products::remove))
        .route("/{id}/image", get(products::image))
        .route("/filtered", post(products::filtered))
        .route("/count", get(products::count))
        .route("/page/{page}", get(products::paginate))
        .route("/search/{keyword}", get(products::search))
        .route(
            "/related/{product_id}/{category_id}",
            get(products::related),
        )
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
