use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use ryde_types::api::{CaptainClaims, UserClaims};
use ryde_types::models::CaptainStatus;

/// Rider tokens live for 24 hours.
pub const USER_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
/// Captain tokens live for 7 days.
pub const CAPTAIN_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Signing configuration shared by every token issued by the service.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    fn secret(&self) -> Result<&[u8], TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(self.secret.as_bytes())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig").field("secret", &"<redacted>").finish()
    }
}

fn sign<C: Serialize>(config: &TokenConfig, claims: &C) -> Result<String, TokenError> {
    let key = EncodingKey::from_secret(config.secret()?);
    Ok(encode(&Header::default(), claims, &key)?)
}

fn verify<C: DeserializeOwned>(config: &TokenConfig, token: &str) -> Result<C, TokenError> {
    let key = DecodingKey::from_secret(config.secret()?);
    Ok(decode::<C>(token, &key, &Validation::default())?.claims)
}

pub fn generate_user_token(config: &TokenConfig, user_id: Uuid) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: user_id,
        iat: now,
        exp: now + USER_TOKEN_TTL_SECS,
    };
    sign(config, &claims)
}

pub fn generate_captain_token(
    config: &TokenConfig,
    captain_id: Uuid,
    email: &str,
    status: CaptainStatus,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = CaptainClaims {
        sub: captain_id,
        email: email.to_string(),
        status,
        iat: now,
        exp: now + CAPTAIN_TOKEN_TTL_SECS,
    };
    sign(config, &claims)
}

pub fn decode_user_token(config: &TokenConfig, token: &str) -> Result<UserClaims, TokenError> {
    verify(config, token)
}

pub fn decode_captain_token(config: &TokenConfig, token: &str) -> Result<CaptainClaims, TokenError> {
    verify(config, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_token_carries_id_and_one_day_expiry() {
        let config = TokenConfig::new("secret");
        let id = Uuid::new_v4();

        let token = generate_user_token(&config, id).unwrap();
        let claims = decode_user_token(&config, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, USER_TOKEN_TTL_SECS);
    }

    #[test]
    fn captain_token_carries_email_and_status() {
        let config = TokenConfig::new("secret");
        let id = Uuid::new_v4();

        let token = generate_captain_token(&config, id, "a@b.com", CaptainStatus::Inactive).unwrap();
        let claims = decode_captain_token(&config, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.status, CaptainStatus::Inactive);
        assert_eq!(claims.exp - claims.iat, CAPTAIN_TOKEN_TTL_SECS);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = generate_user_token(&TokenConfig::new("secret"), Uuid::new_v4()).unwrap();
        assert!(decode_user_token(&TokenConfig::new("other"), &token).is_err());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let result = generate_user_token(&TokenConfig::new(""), Uuid::new_v4());
        assert!(matches!(result, Err(TokenError::MissingSecret)));
    }

    #[test]
    fn user_token_does_not_decode_as_captain() {
        let config = TokenConfig::new("secret");
        let token = generate_user_token(&config, Uuid::new_v4()).unwrap();
        assert!(decode_captain_token(&config, &token).is_err());
    }
}
