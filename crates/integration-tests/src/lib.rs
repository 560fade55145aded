//! End-to-end test harness for Plaza.
//!
//! Boots the full router over the in-memory store on an ephemeral port and
//! drives it with a real HTTP client, so the tests cover routing, the auth
//! gates, multipart handling, and serialization along with the services.
//! No external services are required.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;

use plaza_api::config::ApiConfig;
use plaza_api::db::UserStore;
use plaza_api::db::memory::MemoryStore;
use plaza_api::models::User;
use plaza_api::routes;
use plaza_api::services::auth::hash_password;
use plaza_api::state::AppState;
use plaza_core::{CategoryId, Email, Role, UserId};

/// A running in-process server plus handles to reach behind the HTTP
/// surface where a test needs to seed data.
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    /// Boot the API on an ephemeral port with a fresh in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound; tests have no useful way to
    /// continue from that.
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = ApiConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            token_secret: SecretString::from("integration-test-secret-0123456789ab"),
        };
        let state = AppState::new(config, store.clone());
        let app = routes::router(state.clone());

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind ephemeral listener");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            // The task ends when the test binary exits.
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
            state,
        }
    }

    /// Full URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Seed a category directly in the store.
    #[must_use]
    pub fn seed_category(&self, name: &str) -> CategoryId {
        self.store.seed_category(name).expect("seed category")
    }

    /// Seed an admin account and return a token for it.
    ///
    /// Registration always creates standard accounts, so admin tests go
    /// through the store directly.
    pub async fn admin_token(&self) -> String {
        let user = User {
            id: UserId::generate(),
            name: "Admin".into(),
            email: Email::parse(&format!("admin-{}@plaza.test", UserId::generate()))
                .expect("valid email"),
            password_hash: hash_password("admin-password").expect("hash"),
            role: Role::Admin,
            address: None,
            created_at: Utc::now(),
        };
        let id = user.id;
        self.store.insert_user(user).await.expect("insert admin");
        self.state.tokens().issue(id).expect("issue token")
    }
}

/// A reqwest client for the tests.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
