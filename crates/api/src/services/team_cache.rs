//! Per-user team snapshot cache.
//!
//! Team membership and profile flags are read on almost every request, so
//! each user's snapshot is cached with a short TTL. Mutations that change
//! what a user would see (joins, kicks, renames, profile edits) invalidate
//! the affected users explicitly; the TTL is only the backstop.

use domain::models::UserProfile;
use moka::future::Cache;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use persistence::repositories::{TeamRepository, UserRepository};

use crate::middleware::metrics::{record_team_cache_invalidation, record_team_cache_lookup};

/// A team as seen from one user's perspective.
#[derive(Debug, Clone)]
pub struct CachedTeam {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_owner: bool,
}

/// Everything the request path needs to know about a user's teams.
#[derive(Debug, Clone)]
pub struct TeamSnapshot {
    pub profile: UserProfile,
    pub teams: Vec<CachedTeam>,
}

impl TeamSnapshot {
    pub fn has_team(&self) -> bool {
        !self.teams.is_empty()
    }
}

/// TTL cache of team snapshots, keyed by user ID.
pub struct TeamCache {
    inner: Cache<Uuid, Arc<TeamSnapshot>>,
}

impl TeamCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }

    /// Get a user's cached snapshot, if still fresh.
    pub async fn get(&self, user_id: Uuid) -> Option<Arc<TeamSnapshot>> {
        self.inner.get(&user_id).await
    }

    /// Cache a user's snapshot.
    pub async fn insert(&self, user_id: Uuid, snapshot: TeamSnapshot) {
        self.inner.insert(user_id, Arc::new(snapshot)).await;
    }

    /// Drop a user's snapshot.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.inner.invalidate(&user_id).await;
        record_team_cache_invalidation(1);
    }

    /// Drop the snapshots of every listed user.
    ///
    /// Used when a team-level change affects all members at once, such as a
    /// rename or a team deletion.
    pub async fn invalidate_members(&self, user_ids: &[Uuid]) {
        for user_id in user_ids {
            self.inner.invalidate(user_id).await;
        }
        record_team_cache_invalidation(user_ids.len());
    }

    /// Get a user's snapshot, loading it from the database on a miss.
    ///
    /// The user row is upserted first: a freshly authenticated user may not
    /// have touched any write endpoint yet, and the profile row references
    /// the user row.
    pub async fn get_or_populate(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        username: &str,
    ) -> Result<Arc<TeamSnapshot>, sqlx::Error> {
        if let Some(snapshot) = self.inner.get(&user_id).await {
            record_team_cache_lookup(true);
            return Ok(snapshot);
        }
        record_team_cache_lookup(false);

        let user_repo = UserRepository::new(pool.clone());
        user_repo.upsert_user(user_id, username).await?;
        let profile = user_repo.get_profile(user_id).await?.into();

        let teams = TeamRepository::new(pool.clone())
            .find_user_teams(user_id)
            .await?
            .into_iter()
            .map(|t| CachedTeam {
                id: t.id,
                title: t.title,
                slug: t.slug,
                is_owner: t.is_owner,
            })
            .collect();

        let snapshot = Arc::new(TeamSnapshot { profile, teams });
        self.inner.insert(user_id, snapshot.clone()).await;
        Ok(snapshot)
    }
}
