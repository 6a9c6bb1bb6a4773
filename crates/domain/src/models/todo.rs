//! To-do domain models and the scoped listing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A personal to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

/// A to-do item attached to a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamTodo {
    pub id: Uuid,
    pub team_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

/// Completion status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Open,
    Done,
}

/// Ordering for to-do listings, by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoOrder {
    #[default]
    Newest,
    Oldest,
}

/// Query parameters for the scoped to-do listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TodoQuery {
    /// Case-insensitive keyword matched against titles.
    pub q: Option<String>,
    pub status: Option<TodoStatus>,
    pub order_by: Option<TodoOrder>,
}

/// Personal to-do entry in the scoped listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub completed: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

/// Team to-do entry in the scoped listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamTodoItem {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_title: String,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub completed: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

/// Combined listing of the caller's personal and team to-dos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScopedTodosResponse {
    pub personal: Vec<TodoItem>,
    pub team: Vec<TeamTodoItem>,
    pub dark_mode: bool,
    pub has_team: bool,
}

impl From<Todo> for TodoItem {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            memo: todo.memo,
            important: todo.important,
            completed: todo.date_completed.is_some(),
            date_created: todo.date_created,
            date_completed: todo.date_completed,
        }
    }
}
