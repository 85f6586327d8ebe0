//! Task store trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{Task, TaskStatus};
use crate::Result;

/// Store interface for task CRUD and query operations
///
/// Listing operations return tasks ordered by due date ascending, with
/// tasks that have no due date sorting last.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// Get all tasks, ordered by due date ascending
    async fn list(&self) -> Result<Vec<Task>>;

    /// Update an existing task, refreshing its `updated_at` timestamp
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID, returning whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Whether a task with the given ID exists
    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// Find tasks by status, ordered by due date ascending
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>>;

    /// Find tasks whose due date is before `now` and whose status is not
    /// in `excluded`
    async fn find_overdue(
        &self,
        now: DateTime<Utc>,
        excluded: &[TaskStatus],
    ) -> Result<Vec<Task>>;

    /// Total number of stored tasks
    async fn count(&self) -> Result<u64>;

    /// Number of tasks with the given status
    async fn count_by_status(&self, status: TaskStatus) -> Result<u64>;

    /// Case-insensitive substring search against title or description
    async fn search(&self, term: &str) -> Result<Vec<Task>>;
}

/// Order tasks by due date ascending; tasks without a due date sort last.
/// Ties break on creation time so the ordering is stable.
pub(crate) fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
}
