//! JWT authentication for the booking API
//!
//! Bearer tokens carry the user id, email, and role. The middleware verifies
//! the token and inserts a [`UserIdentity`] into request extensions; admin
//! routes additionally layer [`require_admin`] on top.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::UserRole;
use uuid::Uuid;

use crate::state::AppState;

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role: "customer" | "admin"
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user identity extracted from JWT
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a token, returning the identity it carries
pub fn verify_token(token: &str, secret: &str) -> Result<UserIdentity, AppError> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::invalid_token("Invalid or expired token")
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AppError::invalid_token("Malformed subject claim"))?;
    let role = token_data
        .claims
        .role
        .parse::<UserRole>()
        .map_err(|_| AppError::invalid_token("Malformed role claim"))?;

    Ok(UserIdentity {
        user_id,
        email: token_data.claims.email,
        role,
    })
}

/// Middleware that extracts and verifies the user JWT from the Authorization header
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format").into_response())?;

    let identity =
        verify_token(token, &state.jwt_secret).map_err(axum::response::IntoResponse::into_response)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Middleware that rejects non-admin callers; must run after
/// [`user_auth_middleware`] so the identity extension is present
pub async fn require_admin(request: Request, next: Next) -> Result<Response, Response> {
    let is_admin = request
        .extensions()
        .get::<UserIdentity>()
        .is_some_and(|identity| identity.role.is_admin());

    if !is_admin {
        return Err(
            AppError::new(shared::error::ErrorCode::AdminRequired).into_response(),
        );
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "ada@example.com", UserRole::Customer, SECRET).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.role, UserRole::Customer);
    }

    #[test]
    fn test_admin_role_survives_round_trip() {
        let token = create_token(Uuid::new_v4(), "staff@example.com", UserRole::Admin, SECRET)
            .unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert!(identity.role.is_admin());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(Uuid::new_v4(), "a@b.c", UserRole::Customer, SECRET).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }
}
