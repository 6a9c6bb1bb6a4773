//! User entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{UserProfile, UserPublic};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserPublic {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
        }
    }
}

/// Database row mapping for the user_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct UserProfileEntity {
    pub user_id: Uuid,
    pub bio: String,
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfileEntity> for UserProfile {
    fn from(entity: UserProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            bio: entity.bio,
            dark_mode: entity.dark_mode,
            updated_at: entity.updated_at,
        }
    }
}
