//! Team access guard.
//!
//! Every team-scoped handler resolves the team through this guard, which
//! enforces membership and, where requested, ownership. Failed ownership
//! checks surface as `ApiError::Forbidden`, which renders as 404 so
//! non-owners cannot distinguish "no such team" from "not yours".

use sqlx::PgPool;
use uuid::Uuid;

use persistence::entities::TeamEntity;
use persistence::repositories::{MembershipRepository, TeamRepository};

use crate::error::ApiError;

/// Options for resolving a team on behalf of a caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardOptions {
    /// Require the caller to own the team, not just belong to it.
    pub admin_only: bool,
}

impl GuardOptions {
    pub fn admin_only() -> Self {
        Self { admin_only: true }
    }
}

/// A team resolved for an authorized caller.
#[derive(Debug, Clone)]
pub struct TeamContext {
    pub team: TeamEntity,
    pub is_owner: bool,
}

/// Resolve a team by slug and check the caller's access to it.
///
/// Returns `NotFound` when the slug does not exist, and `Forbidden` when the
/// caller is not a member (or not the owner, with `admin_only`).
pub async fn resolve_team(
    pool: &PgPool,
    slug: &str,
    user_id: Uuid,
    options: GuardOptions,
) -> Result<TeamContext, ApiError> {
    let team = TeamRepository::new(pool.clone())
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".into()))?;

    let is_owner = team.owner_id == user_id;

    if options.admin_only {
        if !is_owner {
            return Err(ApiError::Forbidden("Caller does not own this team".into()));
        }
    } else if !is_owner {
        let is_member = MembershipRepository::new(pool.clone())
            .is_member(team.id, user_id)
            .await?;
        if !is_member {
            return Err(ApiError::Forbidden(
                "Caller is not a member of this team".into(),
            ));
        }
    }

    Ok(TeamContext { team, is_owner })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_options_default_is_member_level() {
        let options = GuardOptions::default();
        assert!(!options.admin_only);
    }

    #[test]
    fn test_guard_options_admin_only() {
        let options = GuardOptions::admin_only();
        assert!(options.admin_only);
    }
}
