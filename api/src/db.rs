use crate::error::{Result, TodoError};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use std::{str::FromStr, time::Duration};

/// Opens the connection pool and brings the schema up to date.
///
/// `sqlite::memory:` databases live only as long as their connection, so
/// callers using one should pass `max_connections = 1`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: i32,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
                SELECT id, description, completed, created_at
                    FROM todos
                ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    pub async fn find_by_id(id: i32, pool: &SqlitePool) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, description, completed, created_at FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Inserts a todo. `description` must already be trimmed and non-empty.
    pub async fn create(description: &str, pool: &SqlitePool) -> Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (description) VALUES (?) RETURNING id, description, completed, created_at",
        )
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Sets the completion flag, the only mutable column.
    pub async fn set_completed(id: i32, completed: bool, pool: &SqlitePool) -> Result<Todo> {
        sqlx::query_as::<_, Todo>(
            "UPDATE todos SET completed = ? WHERE id = ? RETURNING id, description, completed, created_at",
        )
        .bind(completed)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(TodoError::NotFound(id))
    }

    /// Returns whether a row was removed.
    pub async fn delete(id: i32, pool: &SqlitePool) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(deleted.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    pub(crate) async fn memory_pool() -> SqlitePool {
        connect("sqlite::memory:", 1)
            .await
            .expect("in-memory database should open")
    }

    async fn seed(pool: &SqlitePool, descriptions: &[&str]) -> Vec<Todo> {
        let mut todos = vec![];
        for description in descriptions {
            todos.push(Todo::create(description, pool).await.unwrap());
        }
        todos
    }

    #[async_std::test]
    async fn create_assigns_defaults() {
        let pool = memory_pool().await;

        let todo = Todo::create("Buy milk", &pool).await.unwrap();

        assert_eq!(todo.description, "Buy milk");
        assert!(!todo.completed);
        assert!(todo.id > 0);
        let age = Utc::now() - todo.created_at;
        assert!(age < Duration::minutes(1), "created_at too old: {}", age);
        assert!(age > Duration::seconds(-5), "created_at in the future: {}", age);
    }

    #[async_std::test]
    async fn create_persists_the_record() {
        let pool = memory_pool().await;

        let created = Todo::create("Test todo item", &pool).await.unwrap();
        let stored = Todo::find_by_id(created.id, &pool).await.unwrap();

        assert_eq!(stored, Some(created));
    }

    #[async_std::test]
    async fn store_rejects_blank_description() {
        let pool = memory_pool().await;

        let result = Todo::create("   ", &pool).await;

        assert!(matches!(result, Err(TodoError::Storage(_))));
    }

    #[async_std::test]
    async fn find_all_on_empty_table() {
        let pool = memory_pool().await;

        assert!(Todo::find_all(&pool).await.unwrap().is_empty());
    }

    #[async_std::test]
    async fn find_all_returns_insertion_order() {
        let pool = memory_pool().await;
        let seeded = seed(&pool, &["First todo", "Second todo", "Third todo"]).await;
        Todo::set_completed(seeded[1].id, true, &pool).await.unwrap();

        let todos = Todo::find_all(&pool).await.unwrap();

        let summary: Vec<(&str, bool)> = todos
            .iter()
            .map(|todo| (todo.description.as_str(), todo.completed))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("First todo", false),
                ("Second todo", true),
                ("Third todo", false)
            ]
        );
    }

    #[async_std::test]
    async fn set_completed_keeps_immutable_fields() {
        let pool = memory_pool().await;
        let created = Todo::create("Original description", &pool).await.unwrap();

        let completed = Todo::set_completed(created.id, true, &pool).await.unwrap();
        assert_eq!(completed.id, created.id);
        assert_eq!(completed.description, "Original description");
        assert_eq!(completed.created_at, created.created_at);
        assert!(completed.completed);

        let reopened = Todo::set_completed(created.id, false, &pool).await.unwrap();
        assert_eq!(reopened, created);
    }

    #[async_std::test]
    async fn set_completed_persists() {
        let pool = memory_pool().await;
        let created = Todo::create("Database test todo", &pool).await.unwrap();

        Todo::set_completed(created.id, true, &pool).await.unwrap();

        let stored = Todo::find_by_id(created.id, &pool).await.unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.description, "Database test todo");
    }

    #[async_std::test]
    async fn set_completed_on_missing_id() {
        let pool = memory_pool().await;

        let result = Todo::set_completed(999, true, &pool).await;

        assert!(matches!(result, Err(TodoError::NotFound(999))));
    }

    #[async_std::test]
    async fn delete_removes_only_the_target() {
        let pool = memory_pool().await;
        let seeded = seed(&pool, &["First todo", "Second todo", "Third todo"]).await;

        assert!(Todo::delete(seeded[1].id, &pool).await.unwrap());

        let remaining = Todo::find_all(&pool).await.unwrap();
        assert_eq!(remaining, vec![seeded[0].clone(), seeded[2].clone()]);
    }

    #[async_std::test]
    async fn delete_missing_id_is_not_an_error() {
        let pool = memory_pool().await;

        assert!(!Todo::delete(999, &pool).await.unwrap());
    }

    #[async_std::test]
    async fn ids_are_not_reused_after_delete() {
        let pool = memory_pool().await;
        let first = Todo::create("first", &pool).await.unwrap();
        Todo::delete(first.id, &pool).await.unwrap();

        let second = Todo::create("second", &pool).await.unwrap();

        assert!(second.id > first.id);
    }
}
