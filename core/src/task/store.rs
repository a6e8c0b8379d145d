//! In-memory task store backed by a key-value slot
//!
//! The store owns the authoritative collection. Every mutation rewrites the
//! whole slot through [`TaskPersistence`].

use tracing::{info, warn};
use uuid::Uuid;

use super::model::{Task, TaskSubmission};
use super::repository::TaskRepository;
use crate::storage::{KeyValueStore, TaskPersistence};
use crate::{Error, Result};

/// Task store owning the live collection
pub struct TaskStore<S> {
    /// Tasks, newest first
    tasks: Vec<Task>,
    persistence: TaskPersistence<S>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Open a store, loading any previously saved collection
    ///
    /// Nothing is written until the first mutation.
    pub fn open(persistence: TaskPersistence<S>) -> Self {
        let tasks = persistence.load();
        Self { tasks, persistence }
    }

    pub fn persistence(&self) -> &TaskPersistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut TaskPersistence<S> {
        &mut self.persistence
    }

    pub fn into_persistence(self) -> TaskPersistence<S> {
        self.persistence
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Persist the whole collection
    fn persist(&mut self) -> Result<()> {
        self.persistence.save(&self.tasks).map_err(|e| {
            warn!(error = %e, "Failed to save tasks; keeping in-memory state");
            e
        })
    }
}

impl<S: KeyValueStore> TaskRepository for TaskStore<S> {
    fn create(&mut self, submission: &TaskSubmission) -> Result<Task> {
        let details = submission.validate()?;
        let mut task = Task::new(details);
        while self.tasks.iter().any(|t| t.id == task.id) {
            task.id = Uuid::new_v4();
        }

        info!(task_id = %task.id, "Created task");
        self.tasks.insert(0, task.clone());
        self.persist()?;
        Ok(task)
    }

    fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn list(&self) -> &[Task] {
        &self.tasks
    }

    fn update(&mut self, id: Uuid, submission: &TaskSubmission) -> Result<Task> {
        let index = self.position(id)?;
        let details = submission.validate()?;

        let task = &mut self.tasks[index];
        task.apply(details);
        let task = task.clone();

        info!(task_id = %id, "Updated task");
        self.persist()?;
        Ok(task)
    }

    fn toggle_completed(&mut self, id: Uuid) -> Result<Task> {
        let index = self.position(id)?;

        let task = &mut self.tasks[index];
        task.toggle();
        let task = task.clone();

        info!(task_id = %id, completed = task.completed, "Toggled task");
        self.persist()?;
        Ok(task)
    }

    fn delete(&mut self, id: Uuid) -> Result<Task> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);

        info!(task_id = %id, "Deleted task");
        self.persist()?;
        Ok(task)
    }
}
