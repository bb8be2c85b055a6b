use argon2::PasswordHasher;
use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Session claims shared by password logins and the OAuth callback. The
/// avatar travels in the token so profile reads need no database round-trip.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn from_env(secret: String) -> Self {
        // Sessions default to 7 days.
        let expiration_hours = std::env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(24 * 7);
        let issuer = std::env::var("JWT_ISSUER")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self {
            secret,
            expiration_hours,
            issuer,
        }
    }

    pub fn create_session_token(
        &self,
        username: &str,
        email: &str,
        avatar: Option<String>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiration_hours);
        let claims = SessionClaims {
            username: username.to_string(),
            email: email.to_string(),
            avatar,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_session_token(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(
    password: &str,
    stored_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(stored_hash)?;
    let argon2 = Argon2::default();
    let is_valid = argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "secret".to_string(),
            expiration_hours: 1,
            issuer: None,
        }
    }

    #[test]
    fn session_token_roundtrip() {
        let config = config();
        let token = config
            .create_session_token("alice", "alice@example.com", Some("/a.png".to_string()))
            .unwrap();
        let claims = config.verify_session_token(&token).unwrap();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.avatar.as_deref(), Some("/a.png"));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = config();
        let other = JwtConfig {
            secret: "different".to_string(),
            ..config.clone()
        };
        let token = other
            .create_session_token("alice", "alice@example.com", None)
            .unwrap();
        assert!(config.verify_session_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        let now = Utc::now();
        let claims = SessionClaims {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar: None,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
            iss: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(config.verify_session_token(&token).is_err());
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2xY1").unwrap();
        assert!(verify_password("hunter2xY1", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
