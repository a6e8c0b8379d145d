//! Task repository trait
//!
//! Defines the interface the presentation layer uses to read and mutate tasks.

use uuid::Uuid;

use super::model::{Task, TaskSubmission};
use crate::Result;

/// Repository interface for task CRUD operations
///
/// Every mutation is applied to the in-memory collection before it is
/// persisted. A persistence failure is returned as [`crate::Error::Storage`]
/// but the mutation is kept.
pub trait TaskRepository {
    /// Validate a submission and prepend the new task
    fn create(&mut self, submission: &TaskSubmission) -> Result<Task>;

    /// Get a task by ID
    fn get(&self, id: Uuid) -> Option<&Task>;

    /// All tasks, newest first
    fn list(&self) -> &[Task];

    /// Replace the mutable fields of an existing task
    fn update(&mut self, id: Uuid, submission: &TaskSubmission) -> Result<Task>;

    /// Flip the completion flag of a task
    fn toggle_completed(&mut self, id: Uuid) -> Result<Task>;

    /// Delete a task by ID, returning the removed record
    fn delete(&mut self, id: Uuid) -> Result<Task>;
}
