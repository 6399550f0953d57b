pub mod passwords;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use crates::domain::value_objects::enums::user_roles::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::sync::Arc;

use crate::{axum_http::error_responses::AppError, config::config_model::UserSecret};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub role: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// Caller identity taken from a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_therapist(&self) -> bool {
        self.role == UserRole::Therapist
    }
}

pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub fn issue_token(
    secret: &UserSecret,
    user_id: Uuid,
    role: UserRole,
    email: &str,
) -> anyhow::Result<IssuedToken> {
    let now = Utc::now();
    let expires_in = Duration::minutes(secret.ttl_minutes).num_seconds();

    let claims = UserClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        exp: (now.timestamp() + expires_in) as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.secret.as_bytes()),
    )?;

    Ok(IssuedToken { token, expires_in })
}

pub fn validate_user_jwt(token: &str, secret: &str) -> Result<UserClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<UserClaims>(token, &decoding_key, &validation)
        .map_err(|e| AppError::Unauthorized(format!("JWT validation failed: {}", e)))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        // Installed once by the router as a request extension.
        let secret = parts
            .extensions
            .get::<Arc<UserSecret>>()
            .ok_or_else(|| anyhow::anyhow!("user secret extension is not installed"))?;
        let claims = validate_user_jwt(token, &secret.secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;
        let role = UserRole::from_str(&claims.role)
            .ok_or_else(|| AppError::Unauthorized("Invalid role in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests;
