//! Task service
//!
//! Validation, lifecycle rules, and derived queries layered over a
//! [`TaskStore`]. The store is injected so the service works the same
//! over the file-backed and in-memory implementations.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::model::{Task, TaskStatus};
use super::repository::TaskStore;
use crate::{Error, Result};

/// Aggregate task counts, computed fresh on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub completed_tasks: u64,
    pub cancelled_tasks: u64,
    pub overdue_tasks: u64,
}

/// Service enforcing task validation and lifecycle rules
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a new task
    ///
    /// The title must be non-blank after trimming; it is stored trimmed.
    /// The status defaults to pending when not provided.
    pub async fn create_task(
        &self,
        title: &str,
        description: Option<String>,
        status: Option<TaskStatus>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "Task title cannot be empty".to_string(),
            ));
        }

        info!("Creating new task with title: {}", title);

        let mut task = Task::new(title).with_status(status.unwrap_or_default());
        task.description = description;
        task.due_date = due_date;

        let created = self.store.create(task).await?;
        info!("Task created successfully with ID: {}", created.id);
        Ok(created)
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        debug!("Fetching task with ID: {}", id);
        self.store.get(id).await
    }

    /// Get all tasks, ordered by due date ascending
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        debug!("Fetching all tasks");
        self.store.list().await
    }

    /// Get tasks with the given status
    pub async fn tasks_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        debug!("Fetching tasks with status: {:?}", status);
        self.store.find_by_status(status).await
    }

    /// Update only the status of a task
    ///
    /// Returns `None` when no task with the given ID exists.
    pub async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Option<Task>> {
        info!("Updating task {} status to: {:?}", id, status);

        let Some(mut task) = self.store.get(id).await? else {
            warn!("Task with ID {} not found for status update", id);
            return Ok(None);
        };

        task.status = status;
        let updated = self.store.update(task).await?;
        info!("Task {} status updated successfully", id);
        Ok(Some(updated))
    }

    /// Update a task's fields
    ///
    /// The title must be non-blank. Description and due date are
    /// overwritten with the provided values; the status is left
    /// unchanged when not provided. Returns `None` when no task with
    /// the given ID exists.
    pub async fn update_task(
        &self,
        id: Uuid,
        title: &str,
        description: Option<String>,
        status: Option<TaskStatus>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "Task title cannot be empty".to_string(),
            ));
        }

        info!("Updating task with ID: {}", id);

        let Some(mut task) = self.store.get(id).await? else {
            warn!("Task with ID {} not found for update", id);
            return Ok(None);
        };

        task.title = title.to_string();
        task.description = description;
        if let Some(status) = status {
            task.status = status;
        }
        task.due_date = due_date;

        let updated = self.store.update(task).await?;
        info!("Task {} updated successfully", id);
        Ok(Some(updated))
    }

    /// Delete a task by ID
    ///
    /// Returns whether a task was removed.
    pub async fn delete_task(&self, id: Uuid) -> Result<bool> {
        info!("Deleting task with ID: {}", id);

        if !self.store.exists(id).await? {
            warn!("Task with ID {} not found for deletion", id);
            return Ok(false);
        }

        let deleted = self.store.delete(id).await?;
        if deleted {
            info!("Task {} deleted successfully", id);
        }
        Ok(deleted)
    }

    /// Get tasks that are past their due date and still open
    pub async fn overdue_tasks(&self) -> Result<Vec<Task>> {
        debug!("Fetching overdue tasks");
        self.store
            .find_overdue(Utc::now(), &TaskStatus::OVERDUE_EXCLUDED)
            .await
    }

    /// Compute aggregate task statistics
    pub async fn statistics(&self) -> Result<TaskStatistics> {
        debug!("Calculating task statistics");

        let total_tasks = self.store.count().await?;
        let pending_tasks = self.store.count_by_status(TaskStatus::Pending).await?;
        let in_progress_tasks = self.store.count_by_status(TaskStatus::InProgress).await?;
        let completed_tasks = self.store.count_by_status(TaskStatus::Completed).await?;
        let cancelled_tasks = self.store.count_by_status(TaskStatus::Cancelled).await?;
        let overdue_tasks = self.overdue_tasks().await?.len() as u64;

        Ok(TaskStatistics {
            total_tasks,
            pending_tasks,
            in_progress_tasks,
            completed_tasks,
            cancelled_tasks,
            overdue_tasks,
        })
    }

    /// Search tasks by title or description
    ///
    /// A missing or blank term returns the full task list.
    pub async fn search_tasks(&self, term: Option<&str>) -> Result<Vec<Task>> {
        debug!("Searching tasks with term: {:?}", term);

        match term.map(str::trim) {
            Some(term) if !term.is_empty() => self.store.search(term).await,
            _ => self.list_tasks().await,
        }
    }

    /// Seed a fixed set of sample tasks for development
    ///
    /// Idempotent: only runs when the store is empty. Returns whether
    /// seeding happened.
    pub async fn seed_sample_data(&self) -> Result<bool> {
        if self.store.count().await? > 0 {
            debug!("Sample data already exists, skipping initialization");
            return Ok(false);
        }

        info!("Initializing sample data");
        let now = Utc::now();

        self.create_task(
            "Review case documents",
            Some("Review all submitted documents for case ABC123".to_string()),
            Some(TaskStatus::Pending),
            Some(now + Duration::days(2)),
        )
        .await?;

        self.create_task(
            "Schedule hearing",
            Some("Schedule hearing for case DEF456".to_string()),
            Some(TaskStatus::InProgress),
            Some(now + Duration::days(5)),
        )
        .await?;

        self.create_task(
            "Prepare case summary",
            Some("Prepare comprehensive case summary for review".to_string()),
            Some(TaskStatus::Completed),
            Some(now - Duration::days(1)),
        )
        .await?;

        // Past due date and still pending, so this one shows up as overdue
        self.create_task(
            "File legal documents",
            Some("File required legal documents for case GHI789".to_string()),
            Some(TaskStatus::Pending),
            Some(now - Duration::days(1)),
        )
        .await?;

        info!("Sample data initialized successfully");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::MemoryTaskStore;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    #[tokio::test]
    async fn test_create_task_defaults_to_pending() {
        let service = service();

        let task = service
            .create_task("Write report", None, None, None)
            .await
            .unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn test_create_task_trims_title() {
        let service = service();

        let task = service
            .create_task("  Write report  ", None, None, None)
            .await
            .unwrap();

        assert_eq!(task.title, "Write report");
    }

    #[tokio::test]
    async fn test_create_task_rejects_blank_title() {
        let service = service();

        for title in ["", "   ", "\t\n"] {
            let result = service.create_task(title, None, None, None).await;
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }

        // Nothing was persisted
        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_get_after_create() {
        let service = service();
        let due = Utc::now() + Duration::days(3);

        let created = service
            .create_task(
                "Write report",
                Some("Quarterly numbers".to_string()),
                Some(TaskStatus::InProgress),
                Some(due),
            )
            .await
            .unwrap();

        let fetched = service.get_task(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let service = service();

        let a = service.create_task("One", None, None, None).await.unwrap();
        let b = service.create_task("Two", None, None, None).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = service();

        let created = service
            .create_task("Write report", None, None, None)
            .await
            .unwrap();

        let updated = service
            .update_status(created.id, TaskStatus::InProgress)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_status_missing_task() {
        let service = service();

        let result = service
            .update_status(Uuid::new_v4(), TaskStatus::Completed)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_task_overwrites_fields() {
        let service = service();
        let due = Utc::now() + Duration::days(1);

        let created = service
            .create_task(
                "Original",
                Some("Old description".to_string()),
                None,
                None,
            )
            .await
            .unwrap();

        let updated = service
            .update_task(
                created.id,
                "Renamed",
                Some("New description".to_string()),
                None,
                Some(due),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, Some("New description".to_string()));
        assert_eq!(updated.due_date, Some(due));
        // Status untouched when not provided
        assert_eq!(updated.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_task_rejects_blank_title() {
        let service = service();

        let created = service
            .create_task("Original", None, None, None)
            .await
            .unwrap();

        let result = service
            .update_task(created.id, "  ", None, None, None)
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Original record untouched
        let fetched = service.get_task(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Original");
    }

    #[tokio::test]
    async fn test_delete_task_true_then_false() {
        let service = service();

        let created = service
            .create_task("Disposable", None, None, None)
            .await
            .unwrap();

        assert!(service.delete_task(created.id).await.unwrap());
        assert!(service.get_task(created.id).await.unwrap().is_none());
        assert!(!service.delete_task(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_tasks_ordered_by_due_date() {
        let service = service();
        let now = Utc::now();

        service
            .create_task("D2", None, None, Some(now + Duration::days(2)))
            .await
            .unwrap();
        service
            .create_task("D1", None, None, Some(now + Duration::days(1)))
            .await
            .unwrap();
        service
            .create_task("D3", None, None, Some(now + Duration::days(3)))
            .await
            .unwrap();

        let tasks = service.list_tasks().await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["D1", "D2", "D3"]);
    }

    #[tokio::test]
    async fn test_overdue_excludes_closed_statuses() {
        let service = service();
        let past = Utc::now() - Duration::days(1);

        service
            .create_task("Open and late", None, None, Some(past))
            .await
            .unwrap();
        service
            .create_task(
                "Running and late",
                None,
                Some(TaskStatus::InProgress),
                Some(past),
            )
            .await
            .unwrap();
        service
            .create_task(
                "Finished late",
                None,
                Some(TaskStatus::Completed),
                Some(past),
            )
            .await
            .unwrap();
        service
            .create_task(
                "Dropped late",
                None,
                Some(TaskStatus::Cancelled),
                Some(past),
            )
            .await
            .unwrap();

        let overdue = service.overdue_tasks().await.unwrap();
        assert_eq!(overdue.len(), 2);
        assert!(overdue
            .iter()
            .all(|t| t.status == TaskStatus::Pending || t.status == TaskStatus::InProgress));
    }

    #[tokio::test]
    async fn test_statistics_counts_add_up() {
        let service = service();
        let past = Utc::now() - Duration::days(1);

        service
            .create_task("Pending", None, None, Some(past))
            .await
            .unwrap();
        service
            .create_task("Running", None, Some(TaskStatus::InProgress), None)
            .await
            .unwrap();
        service
            .create_task("Done", None, Some(TaskStatus::Completed), Some(past))
            .await
            .unwrap();
        service
            .create_task("Dropped", None, Some(TaskStatus::Cancelled), None)
            .await
            .unwrap();

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(
            stats.pending_tasks
                + stats.in_progress_tasks
                + stats.completed_tasks
                + stats.cancelled_tasks,
            stats.total_tasks
        );
        assert_eq!(
            stats.overdue_tasks,
            service.overdue_tasks().await.unwrap().len() as u64
        );
        assert_eq!(stats.overdue_tasks, 1);
    }

    #[tokio::test]
    async fn test_search_blank_term_returns_all() {
        let service = service();

        service
            .create_task("Review documents", None, None, None)
            .await
            .unwrap();
        service
            .create_task("Schedule hearing", None, None, None)
            .await
            .unwrap();

        let all = service.list_tasks().await.unwrap();
        assert_eq!(service.search_tasks(None).await.unwrap(), all);
        assert_eq!(service.search_tasks(Some("")).await.unwrap(), all);
        assert_eq!(service.search_tasks(Some("   ")).await.unwrap(), all);

        let matched = service.search_tasks(Some("review")).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Review documents");
    }

    #[tokio::test]
    async fn test_seed_sample_data_is_idempotent() {
        let service = service();

        assert!(service.seed_sample_data().await.unwrap());
        assert_eq!(service.list_tasks().await.unwrap().len(), 4);

        // Second call is a no-op
        assert!(!service.seed_sample_data().await.unwrap());
        assert_eq!(service.list_tasks().await.unwrap().len(), 4);

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.in_progress_tasks, 1);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.overdue_tasks, 1);
    }
}
