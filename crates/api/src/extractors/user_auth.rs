//! User JWT authentication extractor.
//!
//! Validates the Bearer token in the Authorization header and exposes the
//! authenticated user's identity to handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;
use shared::jwt::JwtConfig;

/// Authenticated user information from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Username from the identity service.
    pub username: String,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth {
            user_id,
            username: claims.username,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let jwt_config = Self::create_jwt_config(&state.config.jwt).map_err(|e| {
            tracing::error!("Failed to create JWT config: {}", e);
            ApiError::Internal(e)
        })?;

        Self::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}
