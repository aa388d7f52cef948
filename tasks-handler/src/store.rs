//! Storage abstraction for tasks.
//!
//! [`TaskStore`] mirrors the five table operations the handler needs: put, get, update, delete and
//! a filtered scan. The router only talks to the trait so tests can run against
//! [`InMemoryTaskStore`] instead of DynamoDB.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::task::{Task, TaskFields};

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend call itself failed (network, throttling, permissions...).
    #[error("storage backend error during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored item could not be read back as a task.
    #[error("malformed item {id}: {message}")]
    MalformedItem { id: String, message: String },
}

#[async_trait]
/// Keyed task storage.
///
/// Implementations guarantee single-key atomicity only. `update` and `delete` are unconditional:
/// neither reports whether the id existed.
pub trait TaskStore: Send + Sync {
    /// Insert or replace the task stored under `task.id`.
    async fn put(&self, task: &Task) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Task>, StoreError>;

    /// Overwrite `titulo`, `descricao` and `data` of the task under `id`, creating it if absent.
    async fn update(&self, id: &str, fields: TaskFields) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Every task whose `data` equals `date`, in backend scan order.
    async fn scan_by_date(&self, date: &str) -> Result<Vec<Task>, StoreError>;
}

/// Process-local [`TaskStore`].
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<String, Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: &str, fields: TaskFields) -> Result<(), StoreError> {
        match self.tasks.entry(id.to_string()) {
            Entry::Occupied(mut o) => o.get_mut().apply(fields),
            Entry::Vacant(v) => {
                v.insert(Task::with_id(id, fields));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.tasks.remove(id);
        Ok(())
    }

    async fn scan_by_date(&self, date: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .iter()
            .filter(|entry| entry.value().data.as_deref() == Some(date))
            .map(|entry| entry.value().clone())
            .collect())
    }
}
