//! Signed session tokens.
//!
//! Tokens are self-contained HS256 JWTs carrying the account ID and an
//! expiry 7 days out. Verification is stateless: validity is proven by
//! signature and expiry alone, and callers needing the current role must
//! re-fetch the account by the returned ID.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use plaza_core::UserId;

/// Token lifetime in days.
const TOKEN_TTL_DAYS: i64 = 7;

/// Errors from the token service.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature mismatch, malformed token, or expired token. One variant
    /// on purpose: callers get no detail to echo to clients.
    #[error("invalid or expired token")]
    Invalid,
    /// Token encoding failed.
    #[error("token encoding failed")]
    Encode,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    exp: i64,
}

/// Issues and verifies signed session tokens.
///
/// The signing key is injected at construction and held in application
/// state; there is no global.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is rejected from its expiry instant.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for an account, expiring 7 days from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encode`] if signing fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| TokenError::Encode)
    }

    /// Verify a token, returning the account ID it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for any malformed, forged, or
    /// expired token.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("0123456789abcdef0123456789abcdef"))
    }

    #[test]
    fn issued_token_verifies_immediately() {
        let svc = service();
        let id = UserId::generate();
        let token = svc.issue(id).expect("issue");
        assert_eq!(svc.verify(&token).expect("verify"), id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let claims = Claims {
            sub: UserId::generate(),
            exp: (Utc::now() - Duration::seconds(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &svc.encoding)
            .expect("encode expired token");
        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let svc = service();
        let other = TokenService::new(&SecretString::from("ffffffffffffffffffffffffffffffff"));
        let token = other.issue(UserId::generate()).expect("issue");
        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service();
        assert!(matches!(svc.verify(""), Err(TokenError::Invalid)));
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
