//! Profile route handlers.

use axum::{extract::State, Json};
use validator::Validate;

use domain::models::user::{ProfileResponse, UpdateProfileRequest};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Get the caller's profile, creating the default one on first access.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo.upsert_user(auth.user_id, &auth.username).await?;
    let profile = repo.get_profile(auth.user_id).await?;

    Ok(Json(ProfileResponse {
        user: user.into(),
        bio: profile.bio,
        dark_mode: profile.dark_mode,
        updated_at: profile.updated_at,
    }))
}

/// Update the caller's profile. Omitted fields are left unchanged.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    payload.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo.upsert_user(auth.user_id, &auth.username).await?;
    let profile = repo
        .update_profile(auth.user_id, payload.bio.as_deref(), payload.dark_mode)
        .await?;

    // The dark_mode flag rides along in the cached snapshot
    state.team_cache.invalidate(auth.user_id).await;

    Ok(Json(ProfileResponse {
        user: user.into(),
        bio: profile.bio,
        dark_mode: profile.dark_mode,
        updated_at: profile.updated_at,
    }))
}
