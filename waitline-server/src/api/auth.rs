//! Account endpoints: register, login

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{UserRole, UserSummary};

use crate::auth::{password, user_auth};
use crate::db;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "Name is required"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }
    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }

    let existing = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error during register: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::EmailTaken));
    }

    let hashed = password::hash_password(&req.password)
        .map_err(|_| AppError::new(ErrorCode::InternalError))?;

    let user = db::users::create(&state.pool, name, &email, &hashed, UserRole::Customer)
        .await
        .map_err(|e| {
            tracing::error!("DB error creating user: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    let token = user_auth::create_token(user.id, &user.email, UserRole::Customer, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    tracing::info!(user_id = %user.id, "New account registered");

    Ok(Json(AuthResponse {
        token,
        user: UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::authenticate(&state.pool, &email, &req.password)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?
        .ok_or_else(AppError::invalid_credentials)?;

    let role = user
        .role
        .parse::<UserRole>()
        .map_err(|e| AppError::internal(format!("Corrupt user role: {e}")))?;

    let token = user_auth::create_token(user.id, &user.email, role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}
