//! To-do route handlers.
//!
//! A single listing endpoint returns the caller's personal to-dos plus the
//! to-dos of every team they belong to, with shared keyword, status and
//! ordering filters. Team scoping comes from the cached team snapshot.

use axum::{
    extract::{Query, State},
    Json,
};

use domain::models::todo::{ScopedTodosResponse, TeamTodoItem, TodoItem, TodoQuery};
use persistence::repositories::TodoRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// List the caller's personal and team to-dos.
pub async fn list_todos(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<TodoQuery>,
) -> Result<Json<ScopedTodosResponse>, ApiError> {
    let snapshot = state
        .team_cache
        .get_or_populate(&state.pool, auth.user_id, &auth.username)
        .await?;

    let team_ids: Vec<_> = snapshot.teams.iter().map(|t| t.id).collect();

    let repo = TodoRepository::new(state.pool.clone());

    let personal: Vec<TodoItem> = repo
        .list_personal(auth.user_id, &query)
        .await?
        .into_iter()
        .map(|t| TodoItem {
            id: t.id,
            title: t.title,
            memo: t.memo,
            important: t.important,
            completed: t.date_completed.is_some(),
            date_created: t.date_created,
            date_completed: t.date_completed,
        })
        .collect();

    let team: Vec<TeamTodoItem> = repo
        .list_for_teams(&team_ids, &query)
        .await?
        .into_iter()
        .map(|t| TeamTodoItem {
            id: t.id,
            team_id: t.team_id,
            team_title: t.team_title,
            title: t.title,
            memo: t.memo,
            important: t.important,
            completed: t.date_completed.is_some(),
            date_created: t.date_created,
            date_completed: t.date_completed,
        })
        .collect();

    Ok(Json(ScopedTodosResponse {
        personal,
        team,
        dark_mode: snapshot.profile.dark_mode,
        has_team: snapshot.has_team(),
    }))
}
