pub mod memory;
#[cfg(feature = "storage")]
pub mod sqlite;

use async_trait::async_trait;
use crate::core::{NewTodo, StoreError, Todo};

/// CRUD primitives over the single Todo table.
///
/// Absence on lookup is `Ok(None)`; absence on update or delete is
/// [`StoreError::NotFound`].
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError>;
    async fn create(&self, fields: NewTodo) -> Result<Todo, StoreError>;
    async fn update_by_id(&self, id: i64, fields: NewTodo) -> Result<Todo, StoreError>;
    /// Returns the row as it was just before removal.
    async fn delete_by_id(&self, id: i64) -> Result<Todo, StoreError>;
}
