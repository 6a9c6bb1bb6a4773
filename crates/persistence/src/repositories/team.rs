//! Team repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamEntity, TeamWithOwnershipEntity};
use crate::error::{unique_violation, TeamError};
use crate::metrics::QueryTimer;
use shared::identifier::generate_identifier;

/// How many fresh identifiers to try before giving up on a collision.
const IDENTIFIER_RETRIES: usize = 3;

/// Repository for team-related database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Creates a new TeamRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new team and add the creator as its first member.
    ///
    /// The join identifier is generated server-side. On the (unlikely)
    /// identifier collision the insert is retried with a fresh one.
    pub async fn create_team(
        &self,
        title: &str,
        slug: &str,
        owner_id: Uuid,
    ) -> Result<TeamEntity, TeamError> {
        let timer = QueryTimer::new("create_team");

        let mut attempts = 0;
        let team = loop {
            let identifier = generate_identifier(slug);

            // Both the team row and the owner's membership must land together
            let mut tx = self.pool.begin().await?;

            let inserted = sqlx::query_as::<_, TeamEntity>(
                r#"
                INSERT INTO teams (title, slug, identifier, owner_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, slug, identifier, owner_id, created_at
                "#,
            )
            .bind(title)
            .bind(slug)
            .bind(&identifier)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await;

            let team = match inserted {
                Ok(team) => team,
                Err(err) => {
                    tx.rollback().await?;
                    match unique_violation(&err).as_deref() {
                        Some("teams_title_key") | Some("teams_slug_key") => {
                            return Err(TeamError::TitleTaken)
                        }
                        Some("teams_identifier_key") => {
                            attempts += 1;
                            if attempts >= IDENTIFIER_RETRIES {
                                return Err(TeamError::IdentifierTaken);
                            }
                            continue;
                        }
                        _ => return Err(err.into()),
                    }
                }
            };

            sqlx::query(
                r#"
                INSERT INTO team_memberships (team_id, user_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(team.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            break team;
        };

        timer.record();
        Ok(team)
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, title, slug, identifier, owner_id, created_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_slug");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, title, slug, identifier, owner_id, created_at
            FROM teams
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by its join identifier.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_identifier");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, title, slug, identifier, owner_id, created_at
            FROM teams
            WHERE identifier = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find all teams a user belongs to, most recently joined first.
    pub async fn find_user_teams(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TeamWithOwnershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_teams");
        let result = sqlx::query_as::<_, TeamWithOwnershipEntity>(
            r#"
            SELECT
                t.id, t.title, t.slug, t.identifier, t.owner_id, t.created_at,
                (t.owner_id = $1) as is_owner,
                m.joined_at
            FROM teams t
            JOIN team_memberships m ON t.id = m.team_id
            WHERE m.user_id = $1
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Rename a team, regenerating its slug from the new title.
    pub async fn rename_team(
        &self,
        team_id: Uuid,
        title: &str,
        slug: &str,
    ) -> Result<TeamEntity, TeamError> {
        let timer = QueryTimer::new("rename_team");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET title = $2, slug = $3
            WHERE id = $1
            RETURNING id, title, slug, identifier, owner_id, created_at
            "#,
        )
        .bind(team_id)
        .bind(title)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(Some(team)) => Ok(team),
            Ok(None) => Err(TeamError::NotFound),
            Err(err) => match unique_violation(&err).as_deref() {
                Some("teams_title_key") | Some("teams_slug_key") => Err(TeamError::TitleTaken),
                _ => Err(err.into()),
            },
        }
    }

    /// Set a team's join identifier to an explicit value.
    pub async fn set_identifier(
        &self,
        team_id: Uuid,
        identifier: &str,
    ) -> Result<TeamEntity, TeamError> {
        let timer = QueryTimer::new("set_team_identifier");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET identifier = $2
            WHERE id = $1
            RETURNING id, title, slug, identifier, owner_id, created_at
            "#,
        )
        .bind(team_id)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(Some(team)) => Ok(team),
            Ok(None) => Err(TeamError::NotFound),
            Err(err) => match unique_violation(&err).as_deref() {
                Some("teams_identifier_key") => Err(TeamError::IdentifierTaken),
                _ => Err(err.into()),
            },
        }
    }

    /// Replace a team's join identifier with a freshly generated one.
    ///
    /// Invalidates the old identifier, so outstanding copies of it stop
    /// working immediately.
    pub async fn regenerate_identifier(
        &self,
        team_id: Uuid,
        seed: &str,
    ) -> Result<TeamEntity, TeamError> {
        for _ in 0..IDENTIFIER_RETRIES {
            let identifier = generate_identifier(seed);
            match self.set_identifier(team_id, &identifier).await {
                Err(TeamError::IdentifierTaken) => continue,
                other => return other,
            }
        }
        Err(TeamError::IdentifierTaken)
    }

    /// Delete a team.
    ///
    /// Memberships, pending requests and team to-dos cascade.
    pub async fn delete_team(&self, team_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_team");
        let result = sqlx::query(
            r#"
            DELETE FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

}
