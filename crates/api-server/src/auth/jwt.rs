use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdash_core::user::Role;

use super::AuthError;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub sid: String,
    pub role: String,
    pub exp: usize,
}

impl SessionClaims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::Unauthorized("Invalid token subject".to_string()))
    }

    pub fn session_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sid)
            .map_err(|_| AuthError::Unauthorized("Invalid token session".to_string()))
    }
}

/// HS256 signer for session tokens
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    pub fn issue_claims(&self, user_id: Uuid, session_id: Uuid, role: Role) -> Result<SessionClaims, AuthError> {
        let exp = (Utc::now() + Duration::seconds(self.ttl_seconds)).timestamp();
        let exp = usize::try_from(exp)
            .map_err(|_| AuthError::Storage("Failed to encode token expiration".to_string()))?;

        Ok(SessionClaims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            role: role.as_str().to_string(),
            exp,
        })
    }

    pub fn encode_claims(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| AuthError::Storage(format!("Failed to encode JWT: {}", err)))
    }

    pub fn decode_claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let decoded = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|err| AuthError::Unauthorized(format!("Invalid token: {}", err)))?;
        Ok(decoded.claims)
    }
}
