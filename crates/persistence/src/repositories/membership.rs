//! Membership repository for database operations.
//!
//! Covers confirmed memberships and pending join requests, including the
//! atomic accept step that promotes a request into a membership.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    MemberWithUserEntity, PendingMemberEntity, PendingWithUserEntity, TeamMembershipEntity,
};
use crate::error::{unique_violation, MembershipError};
use crate::metrics::QueryTimer;

/// Which association kinds a username lookup may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Confirmed members only.
    Active,
    /// Confirmed members or pending join requests.
    ActiveOrPending,
}

/// A user's resolved association with a team.
#[derive(Debug, Clone)]
pub enum ResolvedTarget {
    Member(MemberWithUserEntity),
    Pending(PendingWithUserEntity),
}

impl ResolvedTarget {
    pub fn user_id(&self) -> Uuid {
        match self {
            ResolvedTarget::Member(m) => m.user_id,
            ResolvedTarget::Pending(p) => p.user_id,
        }
    }
}

/// Repository for membership-related database operations.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a user is a confirmed member of a team.
    pub async fn is_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_is_member");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_memberships
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a user has a pending join request for a team.
    pub async fn has_pending(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_has_pending");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM pending_members
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a join request for a team.
    ///
    /// Fails if the user is already a member or already has a request
    /// waiting.
    pub async fn create_pending(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<PendingMemberEntity, MembershipError> {
        let timer = QueryTimer::new("create_pending");

        if self.is_member(team_id, user_id).await? {
            return Err(MembershipError::AlreadyMember);
        }

        let result = sqlx::query_as::<_, PendingMemberEntity>(
            r#"
            INSERT INTO pending_members (team_id, user_id)
            VALUES ($1, $2)
            RETURNING id, team_id, user_id, requested_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(|err| {
            if unique_violation(&err).is_some() {
                MembershipError::AlreadyPending
            } else {
                err.into()
            }
        })
    }

    /// Promote a pending join request into a confirmed membership.
    ///
    /// Runs in a single transaction: either the request is consumed and the
    /// membership exists afterwards, or nothing changed.
    pub async fn accept_pending(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamMembershipEntity, MembershipError> {
        let timer = QueryTimer::new("accept_pending");

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM pending_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(MembershipError::NotFound);
        }

        let membership = sqlx::query_as::<_, TeamMembershipEntity>(
            r#"
            INSERT INTO team_memberships (team_id, user_id)
            VALUES ($1, $2)
            RETURNING id, team_id, user_id, joined_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await;

        let membership = match membership {
            Ok(m) => m,
            Err(err) => {
                tx.rollback().await?;
                return Err(if unique_violation(&err).is_some() {
                    MembershipError::DuplicateMembership
                } else {
                    err.into()
                });
            }
        };

        tx.commit().await?;
        timer.record();
        Ok(membership)
    }

    /// Discard a pending join request.
    pub async fn reject_pending(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), MembershipError> {
        let timer = QueryTimer::new("reject_pending");
        let result = sqlx::query(
            r#"
            DELETE FROM pending_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();

        if result.rows_affected() == 0 {
            return Err(MembershipError::NotFound);
        }
        Ok(())
    }

    /// Remove a confirmed membership.
    pub async fn remove_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), MembershipError> {
        let timer = QueryTimer::new("remove_membership");
        let result = sqlx::query(
            r#"
            DELETE FROM team_memberships
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();

        if result.rows_affected() == 0 {
            return Err(MembershipError::NotFound);
        }
        Ok(())
    }

    /// List confirmed members of a team, oldest first.
    pub async fn list_members(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<MemberWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_team_members");
        let result = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT m.id, m.team_id, m.user_id, m.joined_at, u.username
            FROM team_memberships m
            JOIN users u ON m.user_id = u.id
            WHERE m.team_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List pending join requests for a team, oldest first.
    pub async fn list_pending(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<PendingWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_members");
        let result = sqlx::query_as::<_, PendingWithUserEntity>(
            r#"
            SELECT p.id, p.team_id, p.user_id, p.requested_at, u.username
            FROM pending_members p
            JOIN users u ON p.user_id = u.id
            WHERE p.team_id = $1
            ORDER BY p.requested_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// IDs of all teams a user is a confirmed member of.
    pub async fn find_user_team_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_team_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT team_id
            FROM team_memberships
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a username to its association with a team.
    ///
    /// `kind` controls whether pending join requests are considered.
    pub async fn resolve_target(
        &self,
        team_id: Uuid,
        username: &str,
        kind: TargetKind,
    ) -> Result<Option<ResolvedTarget>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_member_target");

        let member = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT m.id, m.team_id, m.user_id, m.joined_at, u.username
            FROM team_memberships m
            JOIN users u ON m.user_id = u.id
            WHERE m.team_id = $1 AND u.username = $2
            "#,
        )
        .bind(team_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(member) = member {
            timer.record();
            return Ok(Some(ResolvedTarget::Member(member)));
        }

        if kind == TargetKind::Active {
            timer.record();
            return Ok(None);
        }

        let pending = sqlx::query_as::<_, PendingWithUserEntity>(
            r#"
            SELECT p.id, p.team_id, p.user_id, p.requested_at, u.username
            FROM pending_members p
            JOIN users u ON p.user_id = u.id
            WHERE p.team_id = $1 AND u.username = $2
            "#,
        )
        .bind(team_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(pending.map(ResolvedTarget::Pending))
    }
}

#[cfg(test)]
mod tests {
    // Note: MembershipRepository tests require a database connection and are
    // covered by integration tests
}
