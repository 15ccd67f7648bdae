use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    Sqlite, SqlitePool,
    migrate::MigrateDatabase,
    sqlite::SqlitePoolOptions,
};

use crate::core::{NewTodo, StoreError, Todo};
use crate::storage::TodoStore;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

const COLUMNS: &str = r#"id, name, description, "isCompleted""#;

#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    /// Opens (creating if needed) the database at `url` and makes sure the
    /// Todo table exists.
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(url).await? {
            #[cfg(feature = "tracing")]
            info!(url = %url, "Creating database");
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database. The pool is pinned to one connection
    /// since every SQLite memory connection is its own database.
    pub async fn new_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS "Todo" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                "isCompleted" BOOLEAN NOT NULL DEFAULT 0
            )"#,
        )
        .execute(&pool)
        .await?;
        #[cfg(feature = "tracing")]
        debug!("Todo table ready");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as(&format!(r#"SELECT {COLUMNS} FROM "Todo" ORDER BY id"#))
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as(&format!(r#"SELECT {COLUMNS} FROM "Todo" WHERE id = ?"#))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn create(&self, fields: NewTodo) -> Result<Todo, StoreError> {
        let todo = sqlx::query_as(&format!(
            r#"INSERT INTO "Todo" (name, description, "isCompleted") VALUES (?, ?, ?) RETURNING {COLUMNS}"#
        ))
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.is_completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update_by_id(&self, id: i64, fields: NewTodo) -> Result<Todo, StoreError> {
        sqlx::query_as(&format!(
            r#"UPDATE "Todo" SET name = ?, description = ?, "isCompleted" = ? WHERE id = ? RETURNING {COLUMNS}"#
        ))
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.is_completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<Todo, StoreError> {
        sqlx::query_as(&format!(r#"DELETE FROM "Todo" WHERE id = ? RETURNING {COLUMNS}"#))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, is_completed: bool) -> NewTodo {
        NewTodo {
            name: name.to_string(),
            description: "stored in sqlite".to_string(),
            is_completed,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = SqliteTodoStore::new_memory().await.unwrap();
        let created = store.create(fields("Buy milk", true)).await.unwrap();
        assert_eq!(created.id, 1);
        let fetched = store.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = SqliteTodoStore::new_memory().await.unwrap();
        let created = store.create(fields("Walk dog", true)).await.unwrap();
        let updated = store
            .update_by_id(created.id, fields("Walk cat", false))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Walk cat");
        assert!(!updated.is_completed);
    }

    #[tokio::test]
    async fn delete_returns_last_values_and_ids_are_not_reused() {
        let store = SqliteTodoStore::new_memory().await.unwrap();
        let created = store.create(fields("Old todo", false)).await.unwrap();
        let deleted = store.delete_by_id(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        assert!(store.list_all().await.unwrap().is_empty());

        let next = store.create(fields("New todo", false)).await.unwrap();
        assert!(next.id > created.id);
    }

    #[tokio::test]
    async fn bad_url_is_reported_before_creating_anything() {
        let result = SqliteTodoStore::new("sqlite://never_created.db?mode=bogus").await;
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(!std::path::Path::new("never_created.db").exists());
    }

    #[tokio::test]
    async fn file_database_is_created_on_first_open() {
        let path = std::env::temp_dir().join(format!("todo_service_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let url = format!("sqlite://{}", path.display());

        let store = SqliteTodoStore::new(&url).await.unwrap();
        store.create(fields("On disk", false)).await.unwrap();
        store.close().await;

        let reopened = SqliteTodoStore::new(&url).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap().len(), 1);
        reopened.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = SqliteTodoStore::new_memory().await.unwrap();
        assert!(matches!(
            store.update_by_id(9, fields("Nothing", false)).await,
            Err(StoreError::NotFound(9))
        ));
        assert!(matches!(store.delete_by_id(9).await, Err(StoreError::NotFound(9))));
    }
}
