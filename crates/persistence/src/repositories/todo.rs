//! To-do repository for database operations.

use domain::models::todo::{TodoOrder, TodoQuery, TodoStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamTodoEntity, TodoEntity};
use crate::metrics::QueryTimer;

fn completed_filter(status: Option<TodoStatus>) -> Option<bool> {
    status.map(|s| matches!(s, TodoStatus::Done))
}

/// Repository for to-do database operations.
#[derive(Clone)]
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    /// Creates a new TodoRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's personal to-dos with keyword, status and order filters.
    pub async fn list_personal(
        &self,
        user_id: Uuid,
        query: &TodoQuery,
    ) -> Result<Vec<TodoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_personal_todos");

        let sql = match query.order_by.unwrap_or_default() {
            TodoOrder::Newest => {
                r#"
                SELECT id, user_id, title, memo, important, date_created, date_completed
                FROM todos
                WHERE user_id = $1
                AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
                AND ($3::boolean IS NULL OR (date_completed IS NOT NULL) = $3)
                ORDER BY date_created DESC
                "#
            }
            TodoOrder::Oldest => {
                r#"
                SELECT id, user_id, title, memo, important, date_created, date_completed
                FROM todos
                WHERE user_id = $1
                AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
                AND ($3::boolean IS NULL OR (date_completed IS NOT NULL) = $3)
                ORDER BY date_created ASC
                "#
            }
        };

        let result = sqlx::query_as::<_, TodoEntity>(sql)
            .bind(user_id)
            .bind(query.q.as_deref())
            .bind(completed_filter(query.status))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List to-dos of the given teams with keyword, status and order filters.
    ///
    /// Returns an empty list when `team_ids` is empty.
    pub async fn list_for_teams(
        &self,
        team_ids: &[Uuid],
        query: &TodoQuery,
    ) -> Result<Vec<TeamTodoEntity>, sqlx::Error> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("list_team_todos");

        let sql = match query.order_by.unwrap_or_default() {
            TodoOrder::Newest => {
                r#"
                SELECT
                    tt.id, tt.team_id, t.title as team_title, tt.author_id,
                    tt.title, tt.memo, tt.important, tt.date_created, tt.date_completed
                FROM team_todos tt
                JOIN teams t ON tt.team_id = t.id
                WHERE tt.team_id = ANY($1)
                AND ($2::text IS NULL OR tt.title ILIKE '%' || $2 || '%')
                AND ($3::boolean IS NULL OR (tt.date_completed IS NOT NULL) = $3)
                ORDER BY tt.date_created DESC
                "#
            }
            TodoOrder::Oldest => {
                r#"
                SELECT
                    tt.id, tt.team_id, t.title as team_title, tt.author_id,
                    tt.title, tt.memo, tt.important, tt.date_created, tt.date_completed
                FROM team_todos tt
                JOIN teams t ON tt.team_id = t.id
                WHERE tt.team_id = ANY($1)
                AND ($2::text IS NULL OR tt.title ILIKE '%' || $2 || '%')
                AND ($3::boolean IS NULL OR (tt.date_completed IS NOT NULL) = $3)
                ORDER BY tt.date_created ASC
                "#
            }
        };

        let result = sqlx::query_as::<_, TeamTodoEntity>(sql)
            .bind(team_ids)
            .bind(query.q.as_deref())
            .bind(completed_filter(query.status))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Create a personal to-do.
    pub async fn create_personal(
        &self,
        user_id: Uuid,
        title: &str,
        memo: &str,
        important: bool,
    ) -> Result<TodoEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_personal_todo");
        let result = sqlx::query_as::<_, TodoEntity>(
            r#"
            INSERT INTO todos (user_id, title, memo, important)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, memo, important, date_created, date_completed
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(memo)
        .bind(important)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a team to-do.
    pub async fn create_team_todo(
        &self,
        team_id: Uuid,
        author_id: Uuid,
        title: &str,
        memo: &str,
        important: bool,
    ) -> Result<TeamTodoEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team_todo");
        let result = sqlx::query_as::<_, TeamTodoEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO team_todos (team_id, author_id, title, memo, important)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, team_id, author_id, title, memo, important, date_created, date_completed
            )
            SELECT
                i.id, i.team_id, t.title as team_title, i.author_id,
                i.title, i.memo, i.important, i.date_created, i.date_completed
            FROM inserted i
            JOIN teams t ON i.team_id = t.id
            "#,
        )
        .bind(team_id)
        .bind(author_id)
        .bind(title)
        .bind(memo)
        .bind(important)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a personal to-do complete or reopen it.
    pub async fn set_completed(&self, todo_id: Uuid, completed: bool) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_todo_completed");
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET date_completed = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1
            "#,
        )
        .bind(todo_id)
        .bind(completed)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
