//! User profile domain models.
//!
//! User accounts themselves are owned by the identity service; this backend
//! only stores a lightweight profile row per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public user info exposed in team views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
}

/// A user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub bio: String,
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for updating the caller's profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    pub dark_mode: Option<bool>,
}

/// Profile response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileResponse {
    pub user: UserPublic,
    pub bio: String,
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}
