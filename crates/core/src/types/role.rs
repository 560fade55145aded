//! Account roles.

use serde::{Deserialize, Serialize};

/// The role attached to an account.
///
/// New registrations default to [`Role::Standard`]; catalog mutation is gated
/// to [`Role::Admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Standard,
    Admin,
}

impl Role {
    /// Whether this role may mutate the catalog.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_standard() {
        assert_eq!(Role::default(), Role::Standard);
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).expect("serialize"),
            "\"admin\""
        );
    }
}
