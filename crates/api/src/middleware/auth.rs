//! Authentication and authorization gates.
//!
//! Both gates are axum extractors, so the router composes them before a
//! handler runs and a failing gate short-circuits with an error response.
//! [`RequireAdmin`] performs the [`RequireAuth`] step first: the gates
//! always run left-to-right, and neither has side effects beyond read-only
//! lookups.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use plaza_core::UserId;

use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// Gate that requires a valid session token.
///
/// Extracts the token from the `Authorization` header (with or without a
/// `Bearer` prefix) and verifies it statelessly. On success the resolved
/// account ID is handed to the handler; the account itself is not loaded.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user_id): RequireAuth) -> impl IntoResponse {
///     format!("authenticated as {user_id}")
/// }
/// ```
pub struct RequireAuth(pub UserId);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::AuthenticationFailed)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let user_id = state
            .tokens()
            .verify(token)
            .map_err(|_| ApiError::AuthenticationFailed)?;

        Ok(Self(user_id))
    }
}

/// Gate that requires a valid token for an admin account.
///
/// Runs the [`RequireAuth`] step, then re-fetches the account by ID; a
/// missing account or a non-admin role rejects with an authorization
/// failure. Token verification alone never proves the current role.
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user_id) = RequireAuth::from_request_parts(parts, state).await?;
        let state = AppState::from_ref(state);

        let user = state
            .users()
            .find_user_by_id(user_id)
            .await?
            .ok_or(ApiError::Forbidden)?;
        if !user.role.is_admin() {
            tracing::debug!(user_id = %user.id, "admin gate rejected non-admin");
            return Err(ApiError::Forbidden);
        }

        Ok(Self(user))
    }
}
