//! Team route handlers.
//!
//! Covers team lifecycle, the join request workflow, and member management.
//! Every mutation that changes what a user would see in their team listing
//! invalidates that user's cached snapshot.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

use domain::models::team::{
    generate_slug, ChangeIdentifierRequest, CreateTeamRequest, CreateTeamResponse,
    JoinTeamRequest, JoinTeamResponse, ListTeamsQuery, ListTeamsResponse, MemberResponse,
    PendingResponse, RenameTeamRequest, TeamDetail, TeamSummary,
};
use persistence::repositories::{
    MembershipRepository, ResolvedTarget, TargetKind, TeamRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::guard::{resolve_team, GuardOptions};

/// Response after changing a team's join identifier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentifierResponse {
    pub identifier: String,
}

/// Create a new team owned by the caller.
pub async fn create_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<CreateTeamResponse>), ApiError> {
    payload.validate()?;

    let slug = generate_slug(&payload.title);
    if slug.is_empty() {
        return Err(ApiError::Validation(
            "Title must contain at least one letter or digit".into(),
        ));
    }

    UserRepository::new(state.pool.clone())
        .upsert_user(auth.user_id, &auth.username)
        .await?;

    let team = TeamRepository::new(state.pool.clone())
        .create_team(&payload.title, &slug, auth.user_id)
        .await?;

    state.team_cache.invalidate(auth.user_id).await;

    tracing::info!(team_id = %team.id, slug = %team.slug, "Team created");

    let response = CreateTeamResponse {
        id: team.id,
        title: team.title,
        slug: team.slug,
        identifier: team.identifier,
        owner_id: team.owner_id,
        member_count: 1,
        created_at: team.created_at,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List the caller's teams, served from the snapshot cache.
pub async fn list_teams(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListTeamsQuery>,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let snapshot = state
        .team_cache
        .get_or_populate(&state.pool, auth.user_id, &auth.username)
        .await?;

    let owned_only = query.owned.unwrap_or(false);
    let data: Vec<TeamSummary> = snapshot
        .teams
        .iter()
        .filter(|t| !owned_only || t.is_owner)
        .map(|t| TeamSummary {
            id: t.id,
            title: t.title.clone(),
            slug: t.slug.clone(),
            is_owner: t.is_owner,
        })
        .collect();

    let count = data.len();
    Ok(Json(ListTeamsResponse { data, count }))
}

/// Team management view.
///
/// Members see the roster; the owner additionally sees pending join
/// requests and the join identifier.
pub async fn get_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(slug): Path<String>,
) -> Result<Json<TeamDetail>, ApiError> {
    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::default()).await?;

    let owner = UserRepository::new(state.pool.clone())
        .find_by_id(ctx.team.owner_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Team owner record missing".into()))?;

    let membership_repo = MembershipRepository::new(state.pool.clone());
    let members: Vec<MemberResponse> = membership_repo
        .list_members(ctx.team.id)
        .await?
        .into_iter()
        .map(|m| MemberResponse {
            user: m.user(),
            joined_at: m.joined_at,
        })
        .collect();

    let (pending, identifier) = if ctx.is_owner {
        let pending = membership_repo
            .list_pending(ctx.team.id)
            .await?
            .into_iter()
            .map(|p| PendingResponse {
                user: p.user(),
                requested_at: p.requested_at,
            })
            .collect();
        (Some(pending), Some(ctx.team.identifier.clone()))
    } else {
        (None, None)
    };

    Ok(Json(TeamDetail {
        id: ctx.team.id,
        title: ctx.team.title,
        slug: ctx.team.slug,
        owner: owner.into(),
        is_owner: ctx.is_owner,
        members,
        pending,
        identifier,
        created_at: ctx.team.created_at,
    }))
}

/// Submit a join request using a team's join identifier.
///
/// All applicable rejection reasons are collected and reported together.
pub async fn join_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<JoinTeamRequest>,
) -> Result<(StatusCode, Json<JoinTeamResponse>), ApiError> {
    payload.validate()?;

    UserRepository::new(state.pool.clone())
        .upsert_user(auth.user_id, &auth.username)
        .await?;

    let team = TeamRepository::new(state.pool.clone())
        .find_by_identifier(&payload.identifier)
        .await?;

    let mut reasons = Vec::new();
    let team = match team {
        Some(team) => Some(team),
        None => {
            reasons.push("No team matches this join identifier".to_string());
            None
        }
    };

    if let Some(ref team) = team {
        let membership_repo = MembershipRepository::new(state.pool.clone());
        if membership_repo.is_member(team.id, auth.user_id).await? {
            reasons.push("You are already a member of this team".to_string());
        }
        if membership_repo.has_pending(team.id, auth.user_id).await? {
            reasons.push("You already have a pending join request for this team".to_string());
        }
    }

    if !reasons.is_empty() {
        return Err(ApiError::JoinRejected(reasons));
    }

    let team = team.expect("reasons is empty only when the team was found");

    // A concurrent request may have slipped in between the checks above
    // and this insert; fold those races into the same rejection shape.
    match MembershipRepository::new(state.pool.clone())
        .create_pending(team.id, auth.user_id)
        .await
    {
        Ok(_) => {}
        Err(persistence::error::MembershipError::AlreadyMember) => {
            return Err(ApiError::JoinRejected(vec![
                "You are already a member of this team".to_string(),
            ]));
        }
        Err(persistence::error::MembershipError::AlreadyPending) => {
            return Err(ApiError::JoinRejected(vec![
                "You already have a pending join request for this team".to_string(),
            ]));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(team_id = %team.id, "Join request submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(JoinTeamResponse {
            message: format!("Join request for {} submitted", team.title),
        }),
    ))
}

/// Accept a pending join request. Owner only.
pub async fn accept_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((slug, username)): Path<(String, String)>,
) -> Result<Json<MemberResponse>, ApiError> {
    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::admin_only()).await?;

    let membership_repo = MembershipRepository::new(state.pool.clone());
    let target = membership_repo
        .resolve_target(ctx.team.id, &username, TargetKind::ActiveOrPending)
        .await?;

    let pending = match target {
        Some(ResolvedTarget::Pending(p)) => p,
        Some(ResolvedTarget::Member(_)) => {
            return Err(ApiError::Conflict("User is already a member".into()));
        }
        None => {
            return Err(ApiError::NotFound(
                "No join request from this user".into(),
            ));
        }
    };

    let membership = membership_repo
        .accept_pending(ctx.team.id, pending.user_id)
        .await?;

    // The new member's team listing changed
    state.team_cache.invalidate(pending.user_id).await;

    tracing::info!(team_id = %ctx.team.id, member = %username, "Join request accepted");

    Ok(Json(MemberResponse {
        user: pending.user(),
        joined_at: membership.joined_at,
    }))
}

/// Remove a member, or reject a pending join request. Owner only.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((slug, username)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::admin_only()).await?;

    let membership_repo = MembershipRepository::new(state.pool.clone());
    let target = membership_repo
        .resolve_target(ctx.team.id, &username, TargetKind::ActiveOrPending)
        .await?
        .ok_or_else(|| ApiError::NotFound("User has no association with this team".into()))?;

    match target {
        ResolvedTarget::Member(member) => {
            if member.user_id == ctx.team.owner_id {
                return Err(ApiError::Conflict(
                    "The team owner cannot be removed".into(),
                ));
            }
            membership_repo
                .remove_membership(ctx.team.id, member.user_id)
                .await?;
            state.team_cache.invalidate(member.user_id).await;
            tracing::info!(team_id = %ctx.team.id, member = %username, "Member removed");
        }
        ResolvedTarget::Pending(pending) => {
            membership_repo
                .reject_pending(ctx.team.id, pending.user_id)
                .await?;
            tracing::info!(team_id = %ctx.team.id, member = %username, "Join request rejected");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Leave a team. The owner cannot leave and must delete the team instead.
pub async fn leave_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::default()).await?;

    if ctx.is_owner {
        return Err(ApiError::Conflict(
            "The owner cannot leave the team; delete it instead".into(),
        ));
    }

    MembershipRepository::new(state.pool.clone())
        .remove_membership(ctx.team.id, auth.user_id)
        .await?;

    state.team_cache.invalidate(auth.user_id).await;

    tracing::info!(team_id = %ctx.team.id, "Member left team");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a team and everything attached to it. Owner only.
pub async fn delete_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::admin_only()).await?;

    // Collect member ids before the cascade wipes the membership rows
    let member_ids: Vec<_> = MembershipRepository::new(state.pool.clone())
        .list_members(ctx.team.id)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    TeamRepository::new(state.pool.clone())
        .delete_team(ctx.team.id)
        .await?;

    state.team_cache.invalidate_members(&member_ids).await;

    tracing::info!(team_id = %ctx.team.id, slug = %slug, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Rename a team. Owner only. The slug is regenerated from the new title.
pub async fn rename_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(slug): Path<String>,
    Json(payload): Json<RenameTeamRequest>,
) -> Result<Json<TeamSummary>, ApiError> {
    payload.validate()?;

    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::admin_only()).await?;

    let new_slug = generate_slug(&payload.title);
    if new_slug.is_empty() {
        return Err(ApiError::Validation(
            "Title must contain at least one letter or digit".into(),
        ));
    }

    let member_ids: Vec<_> = MembershipRepository::new(state.pool.clone())
        .list_members(ctx.team.id)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    let team = TeamRepository::new(state.pool.clone())
        .rename_team(ctx.team.id, &payload.title, &new_slug)
        .await?;

    // Cached snapshots carry the old title and slug for every member
    state.team_cache.invalidate_members(&member_ids).await;

    tracing::info!(team_id = %team.id, slug = %team.slug, "Team renamed");

    Ok(Json(TeamSummary {
        id: team.id,
        title: team.title,
        slug: team.slug,
        is_owner: true,
    }))
}

/// Change a team's join identifier. Owner only.
///
/// With no identifier in the payload, a fresh one is generated; either way
/// the previous identifier stops working immediately.
pub async fn change_identifier(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(slug): Path<String>,
    Json(payload): Json<ChangeIdentifierRequest>,
) -> Result<Json<IdentifierResponse>, ApiError> {
    payload.validate()?;

    let ctx = resolve_team(&state.pool, &slug, auth.user_id, GuardOptions::admin_only()).await?;

    let repo = TeamRepository::new(state.pool.clone());
    let team = match payload.identifier {
        Some(identifier) => {
            if identifier == ctx.team.identifier {
                return Err(ApiError::Validation(
                    "New identifier must differ from the current one".into(),
                ));
            }
            repo.set_identifier(ctx.team.id, &identifier).await?
        }
        None => repo.regenerate_identifier(ctx.team.id, &ctx.team.slug).await?,
    };

    tracing::info!(team_id = %team.id, "Join identifier changed");

    Ok(Json(IdentifierResponse {
        identifier: team.identifier,
    }))
}
