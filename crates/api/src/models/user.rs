//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{Email, Role, UserId};

/// A registered account.
///
/// `password_hash` holds an argon2 PHC string from the moment of creation;
/// the plaintext is never stored. Accounts are created on registration and
/// read on login and auth checks; they are never deleted or mutated here.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address. The store enforces uniqueness on the exact string.
    pub email: Email,
    /// Argon2 digest of the password.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Optional postal address.
    pub address: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Client-facing projection of a [`User`].
///
/// This is the only user shape that is ever serialized; the password hash
/// stays server-side.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub address: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            address: user.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_never_carries_the_password_hash() {
        let user = User {
            id: UserId::generate(),
            name: "Ann".into(),
            email: Email::parse("a@x.com").expect("valid email"),
            password_hash: "$argon2id$not-a-real-hash".into(),
            role: Role::Standard,
            address: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserProfile::from(&user)).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["role"], "standard");
    }
}
