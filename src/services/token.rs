// src/services/token.rs
// DOCUMENTATION: Access token issuance and verification (HS256 JWT)

use crate::config::Config;
use crate::errors::TravelError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: Uuid,
    #[serde(default)]
    pub nickname: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiry_secs)
    }

    /// Sign a token for `user_id`
    pub fn issue(&self, user_id: Uuid, nickname: Option<&str>) -> Result<String, TravelError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: user_id,
            nickname: nickname.map(str::to_string),
            iat: now,
            exp: now + self.expiry_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            log::error!("Failed to sign token: {}", e);
            TravelError::InternalError("Failed to sign token".to_string())
        })
    }

    /// Check signature and expiry
    pub fn verify(&self, token: &str) -> Result<Claims, TravelError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::warn!("JWT verification failed: {}", e);
                TravelError::Unauthorized("Invalid token. Access denied.".to_string())
            })
    }
}
