//! Whole-collection persistence to a single key-value slot

use std::collections::HashSet;

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::task::Task;
use crate::Result;

/// Default slot holding the serialized task collection
pub const STORAGE_KEY: &str = "todos-app-data";

/// Serializes the task collection into one slot of a [`KeyValueStore`]
///
/// Only serialized copies pass through here; the live collection is owned by
/// the task store.
#[derive(Debug, Clone)]
pub struct TaskPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TaskPersistence<S> {
    /// Persist into the default [`STORAGE_KEY`] slot
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Overwrite the slot with the full collection
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string(tasks)?;
        self.store.set(&self.key, &content)?;
        debug!(key = %self.key, count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Load the saved collection
    ///
    /// An absent, unreadable or malformed slot yields an empty collection.
    pub fn load(&self) -> Vec<Task> {
        let content = match self.store.get(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(key = %self.key, "No saved tasks");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved tasks; starting empty");
                return Vec::new();
            }
        };

        let tasks: Vec<Task> = match serde_json::from_str(&content) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed saved tasks");
                return Vec::new();
            }
        };

        let tasks = normalize(tasks);
        debug!(key = %self.key, count = tasks.len(), "Loaded tasks");
        tasks
    }

    /// Whether the slot has ever been written
    pub fn has_saved_state(&self) -> bool {
        self.store.contains(&self.key).unwrap_or(false)
    }
}

/// Drop duplicate ids and repair timestamps that run backwards
fn normalize(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| {
            let fresh = seen.insert(task.id);
            if !fresh {
                warn!(task_id = %task.id, "Dropping duplicate saved task");
            }
            fresh
        })
        .map(|mut task| {
            if task.updated_at < task.created_at {
                task.updated_at = task.created_at;
            }
            task
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::task::{local_midnight_utc, Category, Priority, TaskSubmission};
    use chrono::{Duration, NaiveDate};

    fn sample_tasks() -> Vec<Task> {
        let mut done = Task::new(
            TaskSubmission::new("Dentist")
                .with_description("Annual check-up")
                .with_priority(Priority::High)
                .with_category(Category::Health)
                .with_due_date("2024-09-15")
                .validate()
                .unwrap(),
        );
        done.toggle();
        let plain = Task::new(TaskSubmission::new("Buy milk").validate().unwrap());
        vec![done, plain]
    }

    #[test]
    fn test_save_load_round_trip() {
        let tasks = sample_tasks();
        let mut persistence = TaskPersistence::new(MemoryStorage::new());

        persistence.save(&tasks).unwrap();
        assert_eq!(persistence.load(), tasks);
    }

    #[test]
    fn test_save_overwrites_slot() {
        let tasks = sample_tasks();
        let mut persistence = TaskPersistence::new(MemoryStorage::new());

        persistence.save(&tasks).unwrap();
        persistence.save(&tasks[1..]).unwrap();
        assert_eq!(persistence.load(), tasks[1..].to_vec());
    }

    #[test]
    fn test_absent_slot_is_empty() {
        let persistence = TaskPersistence::new(MemoryStorage::new());
        assert!(persistence.load().is_empty());
        assert!(!persistence.has_saved_state());
    }

    #[test]
    fn test_saved_empty_collection_is_distinguishable() {
        let mut persistence = TaskPersistence::new(MemoryStorage::new());
        persistence.save(&[]).unwrap();

        assert!(persistence.load().is_empty());
        assert!(persistence.has_saved_state());
    }

    #[test]
    fn test_malformed_slot_is_empty() {
        for raw in ["not json", "{\"id\": 1}", "[{\"title\": \"missing fields\"}]"] {
            let mut storage = MemoryStorage::new();
            storage.set(STORAGE_KEY, raw).unwrap();
            let persistence = TaskPersistence::new(storage);

            assert!(persistence.load().is_empty(), "{}", raw);
            // Loading leaves the slot untouched
            assert_eq!(
                persistence.store().get(STORAGE_KEY).unwrap(),
                Some(raw.to_string())
            );
        }
    }

    #[test]
    fn test_persisted_layout() {
        let tasks = sample_tasks();
        let mut persistence = TaskPersistence::new(MemoryStorage::new());
        persistence.save(&tasks).unwrap();

        let raw = persistence.store().get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], tasks[0].id.to_string());
        assert_eq!(first["completed"], true);
        assert_eq!(first["priority"], "high");
        assert_eq!(first["category"], "health");
        assert_eq!(first["dueDate"], "2024-09-15");
        assert_eq!(first["description"], "Annual check-up");
        assert!(value[1].get("dueDate").is_none());
        assert!(value[1].get("description").is_none());
    }

    #[test]
    fn test_loads_browser_style_records() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let raw = format!(
            r#"[{{
            "id": "6f1d3a52-2a8e-4c36-9d0c-8f8b5a1f2e3d",
            "title": "Buy milk",
            "completed": false,
            "priority": "low",
            "category": "shopping",
            "dueDate": "{}",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z"
        }}]"#,
            local_midnight_utc(due)
        );
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, &raw).unwrap();

        let tasks = TaskPersistence::new(storage).load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(tasks[0].created_at, tasks[0].updated_at);
    }

    #[test]
    fn test_load_normalizes_records() {
        let mut tasks = sample_tasks();
        tasks[1].updated_at = tasks[1].created_at - Duration::seconds(5);
        let duplicate = tasks[0].clone();
        tasks.push(duplicate);

        let mut persistence = TaskPersistence::new(MemoryStorage::new());
        persistence.save(&tasks).unwrap();

        let loaded = persistence.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].updated_at, loaded[1].created_at);
    }

    #[test]
    fn test_custom_key() {
        let mut persistence = TaskPersistence::with_key(MemoryStorage::new(), "other-slot");
        persistence.save(&sample_tasks()).unwrap();

        assert_eq!(persistence.key(), "other-slot");
        assert!(!persistence.store().contains(STORAGE_KEY).unwrap());
        assert_eq!(persistence.load().len(), 2);
    }
}
