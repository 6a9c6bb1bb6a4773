//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserProfileEntity};
use crate::metrics::QueryTimer;

/// Repository for user and profile database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user or refresh its username from the identity token.
    pub async fn upsert_user(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            RETURNING id, username, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get a user's profile, creating the default row if missing.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_user_profile");
        // DO UPDATE instead of DO NOTHING so RETURNING always yields the row
        let result = sqlx::query_as::<_, UserProfileEntity>(
            r#"
            INSERT INTO user_profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, bio, dark_mode, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a user's profile. Omitted fields keep their current values.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        bio: Option<&str>,
        dark_mode: Option<bool>,
    ) -> Result<UserProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserProfileEntity>(
            r#"
            INSERT INTO user_profiles (user_id, bio, dark_mode)
            VALUES ($1, COALESCE($2, ''), COALESCE($3, false))
            ON CONFLICT (user_id) DO UPDATE SET
                bio = COALESCE($2, user_profiles.bio),
                dark_mode = COALESCE($3, user_profiles.dark_mode),
                updated_at = NOW()
            RETURNING user_id, bio, dark_mode, updated_at
            "#,
        )
        .bind(user_id)
        .bind(bio)
        .bind(dark_mode)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: UserRepository tests require a database connection and are
    // covered by integration tests
}
