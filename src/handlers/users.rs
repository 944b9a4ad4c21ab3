//! Account Handlers
//!
//! Signup, login, logout and the current-user lookup. Login issues an opaque
//! bearer token; [`CurrentUser`] resolves it on any route that asks for it.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::Json,
};
use chrono::{Duration, Utc};
use tracing::info;

use super::router::AppState;
use super::types::{DeleteResponse, LoginRequest, SignupRequest, TokenResponse, UserResponse};
use crate::accounts;
use crate::errors::{AppError, ValidationErrorExt};
use crate::storage::{StoredSession, StoredUser};
use crate::validation;

/// The account behind the request's `Authorization: Bearer` token
///
/// As `Option<CurrentUser>` a missing header is `None`, but a bad token is
/// still rejected.
pub struct CurrentUser {
    pub user: StoredUser,
    token: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
        Ok(Self {
            user: state.authenticate(token)?,
            token: token.to_string(),
        })
    }
}

impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, AppError> {
        match bearer_token(parts) {
            None => Ok(None),
            Some(token) => Ok(Some(Self {
                user: state.authenticate(token)?,
                token: token.to_string(),
            })),
        }
    }
}

fn user_response(user: &StoredUser) -> UserResponse {
    UserResponse {
        id: user.id.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

/// Password hashing is deliberately slow; keep it off the async workers
async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<T, AppError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password task failed: {e}")))
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validation::validate_full_name(&req.full_name).map_validation_err("full_name")?;
    let email = validation::normalize_email(&req.email).map_validation_err("email")?;
    validation::validate_new_password(&req.password, &req.confirm_password)
        .map_validation_err("password")?;

    if state.store.find_user_by_email(&email)?.is_some() {
        return Err(AppError::EmailAlreadyRegistered(email));
    }

    let rounds = state.server_config().password_hash_rounds;
    let password = req.password;
    let password_hash = blocking(move || accounts::hash_password(&password, rounds)).await?;

    let user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        full_name: req.full_name.trim().to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };
    // The check above is advisory; this one is atomic
    if !state.store.create_user(&user)? {
        return Err(AppError::EmailAlreadyRegistered(user.email));
    }

    info!(user_id = %user.id, "Account created");
    Ok((StatusCode::CREATED, Json(user_response(&user))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let rejected = || AppError::Unauthorized("invalid email or password".to_string());

    let email = validation::normalize_email(&req.email).map_err(|_| rejected())?;
    let user = state.store.find_user_by_email(&email)?.ok_or_else(rejected)?;

    let stored_hash = user.password_hash.clone();
    let password = req.password;
    let verified = blocking(move || accounts::verify_password(&password, &stored_hash))
        .await?
        .map_err(AppError::Internal)?;
    if !verified {
        info!(user_id = %user.id, "Login rejected");
        return Err(rejected());
    }

    let token = accounts::new_token();
    let now = Utc::now();
    let expires_at = now + Duration::minutes(state.server_config().session_ttl_minutes);
    state.store.put_session(
        &accounts::token_digest(&token),
        &StoredSession {
            user_id: user.id.clone(),
            created_at: now,
            expires_at,
        },
    )?;

    info!(user_id = %user.id, "Login succeeded");
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_at,
        user: user_response(&user),
    }))
}

/// GET /auth/me
pub async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(user_response(&current.user))
}

/// POST /auth/logout - revokes the presented token
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DeleteResponse>, AppError> {
    state
        .store
        .delete_session(&accounts::token_digest(&current.token))?;
    info!(user_id = %current.user.id, "Logged out");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Logged out".to_string(),
    }))
}
