//! In-memory task storage implementation
//!
//! Holds tasks in a map with no persistence. Useful for tests and
//! ephemeral deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Task, TaskStatus};
use super::repository::{sort_by_due_date, TaskStore};
use crate::{Error, Result};

/// In-memory task store
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(Error::InvalidInput(format!(
                "Task with ID {} already exists",
                task.id
            )));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        sort_by_due_date(&mut all);
        Ok(all)
    }

    async fn update(&self, mut task: Task) -> Result<Task> {
        task.updated_at = Utc::now();
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id) {
            return Err(Error::TaskNotFound(task.id.to_string()));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let tasks = self.tasks.read().await;
        Ok(tasks.contains_key(&id))
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        sort_by_due_date(&mut matching);
        Ok(matching)
    }

    async fn find_overdue(
        &self,
        now: DateTime<Utc>,
        excluded: &[TaskStatus],
    ) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| {
                t.due_date.is_some_and(|due| due < now) && !excluded.contains(&t.status)
            })
            .cloned()
            .collect();
        sort_by_due_date(&mut matching);
        Ok(matching)
    }

    async fn count(&self) -> Result<u64> {
        let tasks = self.tasks.read().await;
        Ok(tasks.len() as u64)
    }

    async fn count_by_status(&self, status: TaskStatus) -> Result<u64> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().filter(|t| t.status == status).count() as u64)
    }

    async fn search(&self, term: &str) -> Result<Vec<Task>> {
        let needle = term.to_lowercase();
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        sort_by_due_date(&mut matching);
        Ok(matching)
    }
}
