//! Core library for the todo tracker
//!
//! This crate contains the task-management logic, including:
//! - Task records and submission validation
//! - The task store and its persistence to a key-value slot
//! - Filtering and summary statistics

pub mod error;
pub mod filter;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{Error, TaskField};
pub use filter::{StatusFilter, TaskFilter};
pub use stats::TaskStats;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, TaskPersistence, STORAGE_KEY};
pub use task::{Category, Priority, Task, TaskRepository, TaskStore, TaskSubmission};

pub type Result<T> = std::result::Result<T, Error>;
