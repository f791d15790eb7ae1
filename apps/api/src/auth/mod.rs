//! Authentication: JWT access tokens, Argon2id password hashing, the
//! bearer-token extractor, and the OTP-gated signup/login flow.

pub mod handlers;
pub mod otp;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

const TOKEN_TTL_DAYS: i64 = 30;

pub const ROLE_CANDIDATE: &str = "candidate";
pub const ROLE_RECRUITER: &str = "recruiter";

/// Free-mail domains that cannot stand in for a company identity.
/// Includes the two most common corporate-email typos seen in signups.
const PUBLIC_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "rediffmail.com",
    "protonmail.com",
    "gamil.com",
    "yaho.com",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id as a string.
    pub sub: String,
    /// "candidate" or "recruiter" — downstream authorization keys off this.
    pub role: String,
    /// Unix expiry timestamp.
    pub exp: usize,
}

pub fn create_access_token(secret: &str, subject_id: i32, role: &str) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: subject_id.to_string(),
        role: role.to_string(),
        exp,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// True when the address uses a free-mail domain rather than a company one.
pub fn is_public_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| PUBLIC_EMAIL_DOMAINS.contains(&domain.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extractor for routes requiring a valid bearer token.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        let claims = verify_token(&state.config.jwt_secret, token)?;
        Ok(AuthUser(claims))
    }
}
