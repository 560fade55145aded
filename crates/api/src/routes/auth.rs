//! Account route handlers: registration, login, and auth checks.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::UserProfile;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful registration or login: the account projection plus a fresh
/// session token.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Body for the auth/admin check endpoints.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub ok: bool,
}

/// Register a new account.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns a validation error for a blank name, malformed email, or short
/// password, and a conflict when the email is taken.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.users());
    let user = auth.register(&req.name, &req.email, &req.password).await?;
    let token = state
        .tokens()
        .issue(user.id)
        .map_err(|_| ApiError::Internal("token signing failed".into()))?;

    Ok(Json(SessionResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Log in to an existing account.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns an authentication failure for an unknown email or wrong
/// password, without distinguishing the two.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.users());
    let user = auth.login(&req.email, &req.password).await?;
    let token = state
        .tokens()
        .issue(user.id)
        .map_err(|_| ApiError::Internal("token signing failed".into()))?;

    Ok(Json(SessionResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Confirm the caller holds a valid token.
///
/// GET /api/auth/check
pub async fn auth_check(RequireAuth(_): RequireAuth) -> Json<CheckResponse> {
    Json(CheckResponse { ok: true })
}

/// Confirm the caller holds a valid token for an admin account.
///
/// GET /api/auth/admin-check
pub async fn admin_check(RequireAdmin(_): RequireAdmin) -> Json<CheckResponse> {
    Json(CheckResponse { ok: true })
}
