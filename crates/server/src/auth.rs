//! Authentication gate: token issuance and verification, password hashing,
//! and resolution of the calling user from request headers.

use crate::{error::AppError, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use chrono::{DateTime, TimeDelta, Utc};
use database::{entities::user, services::user::UserService};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;
use models::role::Role;
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the token on authenticated requests
pub const AUTH_HEADER: &str = "x-auth";

const BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    Expired,

    #[error("Token lifetime of {0}s cannot be applied")]
    InvalidLifetime(i64),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::Expired => {
                AppError::unauthorized("Invalid or expired token")
            }
            other => AppError::internal(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 tokens.
///
/// Expiry is checked against the caller supplied time rather than the system
/// clock, so the same [`Clock`](database::clock::Clock) drives tokens and
/// term dates.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl Authenticator {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn create_token(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = TimeDelta::try_seconds(self.ttl_secs)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(AuthError::InvalidLifetime(self.ttl_secs))?;

        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    /// Hashes a password on the blocking pool
    pub async fn hash_password(password: String) -> Result<String, AuthError> {
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST)).await??;
        Ok(hash)
    }

    pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(matches)
    }
}

/// Why a request could not be tied to a user
#[derive(Debug)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken,
    Internal(AppError),
}

/// The authenticated caller, resolved from the `x-auth` header
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: user::Model,
}

impl Identity {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Carts and schedules belong to students only
    pub fn require_student(&self, feature: &str) -> Result<(), AppError> {
        if self.role().is_student() {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "{feature} is only available for students"
            )))
        }
    }

    pub fn require_course_manager(&self) -> Result<(), AppError> {
        if self.role().can_manage_courses() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Insufficient permissions to manage courses",
            ))
        }
    }

    pub fn require_course_admin(&self) -> Result<(), AppError> {
        if self.role().can_delete_courses() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Insufficient permissions to delete courses",
            ))
        }
    }
}

/// Resolves the caller from request headers.
///
/// A token for a user that no longer exists counts as invalid.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, AuthFailure> {
    let token = headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthFailure::MissingToken)?;

    let claims = state
        .auth
        .verify_token(token, state.clock.now())
        .map_err(|e| {
            debug!("Rejected token: {e}");
            AuthFailure::InvalidToken
        })?;

    let user = UserService::find_by_id(state.store.as_ref(), claims.user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.into()))?
        .ok_or(AuthFailure::InvalidToken)?;

    Ok(Identity { user })
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers)
            .await
            .map_err(|failure| match failure {
                AuthFailure::MissingToken => AppError::unauthorized("Access token required"),
                AuthFailure::InvalidToken => AppError::unauthorized("Invalid or expired token"),
                AuthFailure::Internal(err) => err,
            })
    }
}

#[cfg(test)]
mod test {
    use super::{AuthError, Authenticator};
    use chrono::{Duration, TimeZone, Utc};
    use sea_orm::prelude::Uuid;

    #[test]
    fn test_token_round_trip_and_expiry() {
        let auth = Authenticator::new("test-secret", 3600);
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let user_id = Uuid::new_v4();

        let token = auth.create_token(user_id, issued).unwrap();

        let claims = auth
            .verify_token(&token, issued + Duration::minutes(59))
            .unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);

        assert!(matches!(
            auth.verify_token(&token, issued + Duration::hours(1)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_unusable_lifetimes_fail_without_panicking() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        for ttl_secs in [i64::MAX, 9_000_000_000_000_000, 0, -60] {
            let auth = Authenticator::new("s", ttl_secs);
            assert!(
                matches!(
                    auth.create_token(Uuid::new_v4(), now),
                    Err(AuthError::InvalidLifetime(secs)) if secs == ttl_secs
                ),
                "ttl {ttl_secs}"
            );
        }
    }

    #[test]
    fn test_rejects_foreign_and_malformed_tokens() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let ours = Authenticator::new("ours", 3600);
        let theirs = Authenticator::new("theirs", 3600);

        let token = theirs.create_token(Uuid::new_v4(), now).unwrap();
        assert!(matches!(
            ours.verify_token(&token, now),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(ours.verify_token("not-a-token", now).is_err());
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = Authenticator::hash_password("hunter22".to_string())
            .await
            .unwrap();

        assert_ne!(hash, "hunter22");
        assert!(
            Authenticator::verify_password("hunter22".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !Authenticator::verify_password("wrong".to_string(), hash)
                .await
                .unwrap()
        );
    }
}
