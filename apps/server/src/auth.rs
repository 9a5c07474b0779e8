use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use monitor_ppr_core::{
    errors::Error as CoreError,
    users::{CredentialHasher, User},
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, main_lib::AppState};

const INVALID_TOKEN: &str = "No se pudieron validar las credenciales";

/// Argon2 PHC strings for stored passwords.
#[derive(Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> monitor_ppr_core::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::Unexpected(format!("Password hashing failed: {e}")))
    }

    fn verify(&self, password: &str, password_hash: &str) -> monitor_ppr_core::Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| CoreError::Unexpected(format!("Stored password hash is invalid: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(other) => Err(CoreError::Unexpected(format!(
                "Password verification failed: {other}"
            ))),
        }
    }
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized(INVALID_TOKEN.to_string()),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// The authenticated, active account behind the current request.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl AuthManager {
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: i32) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now
            .checked_add(self.token_ttl)
            .filter(|exp| usize::try_from(exp.as_secs()).is_ok())
            .ok_or_else(|| AuthError::Internal("Token lifetime is out of range".into()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn validate_token(&self, token: &str) -> Result<i32, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => AuthError::Unauthorized,
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            },
        )?;
        data.claims
            .sub
            .parse::<i32>()
            .map_err(|_| AuthError::Unauthorized)
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    if let Ok(bytes) = BASE64.decode(trimmed) {
        if bytes.len() == 32 {
            return Ok(bytes);
        }
    }
    // A 32 character ASCII key is used as-is, even when it also happens to
    // be valid base64 of a shorter key.
    if trimmed.len() == 32 && trimmed.is_ascii() {
        return Ok(trimmed.as_bytes().to_vec());
    }
    anyhow::bail!("JWT secret must be base64 of 32 bytes or a 32 character ASCII string")
}

fn bearer_token(request: &Request<Body>) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }
    Ok(token)
}

/// Validates the bearer token and loads its account. Deleted accounts are
/// rejected as unauthenticated and inactive ones as a bad request.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.auth.validate_token(bearer_token(&request)?)?;
    let user = state.user_service.resolve_active(user_id)?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
