use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{NewTodo, StoreError, Todo};

use super::TodoStore;

#[derive(Default)]
struct Rows {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

/// In-process store with the same contract as the SQLite one. Ids grow
/// monotonically and are never handed out twice, even after deletes.
#[derive(Default)]
pub struct MemoryTodoStore {
    rows: RwLock<Rows>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.rows.read().await.todos.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.rows.read().await.todos.get(&id).cloned())
    }

    async fn create(&self, fields: NewTodo) -> Result<Todo, StoreError> {
        let mut rows = self.rows.write().await;
        rows.last_id += 1;
        let todo = Todo::from_new(rows.last_id, fields);
        rows.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_by_id(&self, id: i64, fields: NewTodo) -> Result<Todo, StoreError> {
        let mut rows = self.rows.write().await;
        let todo = rows.todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *todo = Todo::from_new(id, fields);
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<Todo, StoreError> {
        self.rows
            .write()
            .await
            .todos
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}
