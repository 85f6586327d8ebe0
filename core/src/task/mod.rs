//! Task module
//!
//! This module contains task-related types and logic.

mod file_store;
mod memory_store;
mod model;
mod repository;
mod service;

pub use file_store::FileTaskStore;
pub use memory_store::MemoryTaskStore;
pub use model::*;
pub use repository::TaskStore;
pub use service::{TaskService, TaskStatistics};
