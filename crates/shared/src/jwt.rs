//! JWT access token validation using RS256.
//!
//! Session management and token issuance live in the identity service; this
//! backend only needs to verify bearer tokens and extract a stable user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username, as registered with the identity service
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for JWT validation (and generation, used by tests and
/// local tooling).
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds
    pub access_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new JwtConfig from an RSA key pair in PEM format.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        Self::with_leeway(
            private_key_pem,
            public_key_pem,
            access_token_expiry_secs,
            DEFAULT_LEEWAY_SECS,
        )
    }

    /// Creates a new JwtConfig with a custom clock-skew leeway.
    pub fn with_leeway(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Creates a JwtConfig for testing with an HS256 symmetric key.
    /// DO NOT use in production - only for tests.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            leeway_secs: 0, // Strict for testing - no leeway
        }
    }

    /// Generates an access token for the given user ID.
    ///
    /// Returns the encoded token and its `jti`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        username: &str,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let header = Header::new(self.algorithm());
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates an access token and returns its claims.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Tests use HS256, production uses RS256.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

/// Extracts the user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> JwtConfig {
        JwtConfig::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id, "alice").unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn test_validate_garbage_token() {
        let config = create_test_config();
        let result = config.validate_access_token("not-a-jwt");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let mut config = create_test_config();
        config.access_token_expiry_secs = -10; // Already expired at issuance

        let (token, _) = config.generate_access_token(Uuid::new_v4(), "bob").unwrap();
        let result = config.validate_access_token(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_validate_wrong_key() {
        let config = create_test_config();
        let other = JwtConfig::new_for_testing("a_completely_different_secret_key");

        let (token, _) = config.generate_access_token(Uuid::new_v4(), "bob").unwrap();
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            username: "alice".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        };
        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_extract_user_id_invalid() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            username: "alice".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        };
        assert!(extract_user_id(&claims).is_err());
    }

    #[test]
    fn test_invalid_rsa_key_rejected() {
        let result = JwtConfig::new("not a pem", "also not a pem", 900);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_jwt_config_debug_redacts_keys() {
        let config = create_test_config();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("test_secret_key"));
    }
}
