//! Team entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{PendingMember, Team, TeamMembership, UserPublic};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub identifier: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<TeamEntity> for Team {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            slug: entity.slug,
            identifier: entity.identifier,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the team_memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMembershipEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl From<TeamMembershipEntity> for TeamMembership {
    fn from(entity: TeamMembershipEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            joined_at: entity.joined_at,
        }
    }
}

/// Database row mapping for the pending_members table.
#[derive(Debug, Clone, FromRow)]
pub struct PendingMemberEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub requested_at: DateTime<Utc>,
}

impl From<PendingMemberEntity> for PendingMember {
    fn from(entity: PendingMemberEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            requested_at: entity.requested_at,
        }
    }
}

/// Team row joined with the caller's ownership flag.
#[derive(Debug, Clone, FromRow)]
pub struct TeamWithOwnershipEntity {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub identifier: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_owner: bool,
    pub joined_at: DateTime<Utc>,
}

/// Membership row joined with user info, for listing members.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUserEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub username: String,
}

impl MemberWithUserEntity {
    pub fn user(&self) -> UserPublic {
        UserPublic {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}

/// Pending join request joined with user info.
#[derive(Debug, Clone, FromRow)]
pub struct PendingWithUserEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub username: String,
}

impl PendingWithUserEntity {
    pub fn user(&self) -> UserPublic {
        UserPublic {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}
