//! To-do entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{TeamTodo, Todo};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the todos table.
#[derive(Debug, Clone, FromRow)]
pub struct TodoEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

impl From<TodoEntity> for Todo {
    fn from(entity: TodoEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            memo: entity.memo,
            important: entity.important,
            date_created: entity.date_created,
            date_completed: entity.date_completed,
        }
    }
}

/// Team to-do row joined with its team's title.
#[derive(Debug, Clone, FromRow)]
pub struct TeamTodoEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_title: String,
    pub author_id: Uuid,
    pub title: String,
    pub memo: String,
    pub important: bool,
    pub date_created: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
}

impl From<TeamTodoEntity> for TeamTodo {
    fn from(entity: TeamTodoEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            author_id: entity.author_id,
            title: entity.title,
            memo: entity.memo,
            important: entity.important,
            date_created: entity.date_created,
            date_completed: entity.date_completed,
        }
    }
}
