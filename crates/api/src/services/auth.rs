//! Credential service: password hashing plus registration and login.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use plaza_core::{Email, EmailError, Role, UserId};

use crate::db::{StoreError, UserStore};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from the credential service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The display name is empty after trimming.
    #[error("name is required")]
    MissingName,
    /// The email failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// The password does not meet requirements.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
    /// The email is already registered.
    #[error("email is already registered")]
    EmailTaken,
    /// Login failed. Deliberately does not say whether the email or the
    /// password was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Hashing failed.
    #[error("password hashing failed")]
    Hash,
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hash a password into an argon2 PHC string with a fresh random salt.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::Hash)?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored digest.
///
/// Malformed digests verify as `false`; this never errors.
#[must_use]
pub fn verify_password(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Check password requirements.
///
/// # Errors
///
/// Returns [`AuthError::WeakPassword`] for passwords under 8 characters.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Registration and login over the user store.
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    /// Create a new credential service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// The stored user carries only the password digest, never the
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingName`], [`AuthError::InvalidEmail`] or
    /// [`AuthError::WeakPassword`] on invalid input, and
    /// [`AuthError::EmailTaken`] when the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email,
            password_hash: hash_password(password)?,
            role: Role::Standard,
            address: None,
            created_at: Utc::now(),
        };

        // The store enforces uniqueness as well; map a racing insert to the
        // same client-facing conflict.
        let user = self.users.insert_user(user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate an account by email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// failed verification, without distinguishing the two.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.id, "user logged in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn digest_differs_from_plaintext_and_verifies() {
        let digest = hash_password("hunter2hunter2").expect("hash");
        assert_ne!(digest, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &digest));
        assert!(!verify_password("wrong-password", &digest));
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        // Salted hashing: equality of plaintext never means equality of digests.
        let a = hash_password("correct horse").expect("hash");
        let b = hash_password("correct horse").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let svc = service();
        let user = svc
            .register("Ann", "a@x.com", "longenough")
            .await
            .expect("register");
        assert_ne!(user.password_hash, "longenough");
        assert!(verify_password("longenough", &user.password_hash));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let svc = service();
        assert!(matches!(
            svc.register("Ann", "a@x.com", "short").await,
            Err(AuthError::WeakPassword)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        svc.register("Ann", "a@x.com", "longenough")
            .await
            .expect("first registration");
        assert!(matches!(
            svc.register("Ann Again", "a@x.com", "longenough").await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_uniform_failure() {
        let svc = service();
        svc.register("Ann", "a@x.com", "longenough")
            .await
            .expect("register");

        let wrong_password = svc.login("a@x.com", "wrong-password").await;
        let unknown_email = svc.login("b@x.com", "longenough").await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }
}
