//! URL-safe slugs derived from display names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A lowercase, URL-safe identifier derived from a display name.
///
/// Derivation is deterministic: the name is trimmed and lowercased, and every
/// run of non-alphanumeric characters collapses into a single hyphen. Whenever
/// a product is renamed its slug is recomputed with the same rules.
///
/// ```
/// use plaza_core::Slug;
///
/// assert_eq!(Slug::from_name("  Red Shirt  ").as_str(), "red-shirt");
/// assert_eq!(Slug::from_name("Déjà Vu 2.0").as_str(), "d-j-vu-2-0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a display name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut out = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for c in name.trim().chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        Self(out)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
