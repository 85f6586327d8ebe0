//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use tm_core::task::{FileTaskStore, TaskService, TaskStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub task_service: TaskService,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf) -> tm_core::Result<Self> {
        let tasks_path = data_dir.join("tasks.json");
        let task_store: Arc<dyn TaskStore> = Arc::new(FileTaskStore::new(tasks_path).await?);
        Ok(Self::with_store(task_store))
    }

    /// Create a new AppState over an arbitrary task store
    pub fn with_store(task_store: Arc<dyn TaskStore>) -> Self {
        let task_service = TaskService::new(task_store);
        Self {
            inner: Arc::new(AppStateInner { task_service }),
        }
    }

    /// Get reference to the task service
    pub fn task_service(&self) -> &TaskService {
        &self.inner.task_service
    }
}
