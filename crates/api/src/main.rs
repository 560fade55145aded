//! Plaza API - account and catalog service.
//!
//! This binary serves the JSON API on port 3000 by default.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Argon2 password hashing, HS256 session tokens (7-day expiry)
//! - Store trait seam with an in-memory reference backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use plaza_api::config::ApiConfig;
use plaza_api::db::memory::MemoryStore;
use plaza_api::routes;
use plaza_api::state::AppState;

#[tokio::main]
async fn main() {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter.
    // Defaults to info level for our crate if RUST_LOG is not set.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plaza_api=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = Arc::new(MemoryStore::new());
    // Categories are owned outside this service; give a fresh in-memory
    // deployment something to attach products to.
    for name in ["Apparel", "Footwear", "Accessories"] {
        if let Err(e) = store.seed_category(name) {
            tracing::warn!(error = %e, category = name, "failed to seed category");
        }
    }

    let addr = config.socket_addr();
    let state = AppState::new(config, store);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "plaza-api listening");

    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}
