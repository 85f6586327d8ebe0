//! Core library for the task management service
//!
//! This crate contains the core business logic, including:
//! - The task model and its lifecycle rules
//! - The task store abstraction and its implementations
//! - The task service (validation, derived queries, statistics)

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
