//! Task filtering
//!
//! A [`TaskFilter`] selects the visible subset of the collection. All set
//! clauses must match; input order is preserved.

use serde::{Deserialize, Serialize};

use crate::task::{Category, Priority, Task};

/// Completion status to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Transient query describing which tasks are visible
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Case-insensitive substring of the title or description
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// True when no clause narrows the collection
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.status == StatusFilter::All
            && self.priority.is_none()
            && self.category.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task, &self.search.to_lowercase())
    }

    fn matches_search(&self, task: &Task, needle_lower: &str) -> bool {
        (needle_lower.is_empty() || task.mentions(needle_lower))
            && self.status.matches(task)
            && self.priority.map_or(true, |p| p == task.priority)
            && self.category.map_or(true, |c| c == task.category)
    }

    /// Select the matching tasks, preserving their order
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let needle = self.search.to_lowercase();
        tasks
            .into_iter()
            .filter(|task| self.matches_search(task, &needle))
            .collect()
    }
}

/// Select the tasks matching `filter`, preserving their order
pub fn apply<'a, I>(tasks: I, filter: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter.apply(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskSubmission;

    fn task(submission: TaskSubmission, completed: bool) -> Task {
        let mut task = Task::new(submission.validate().unwrap());
        if completed {
            task.toggle();
        }
        task
    }

    fn sample() -> Vec<Task> {
        vec![
            task(
                TaskSubmission::new("Buy MILK")
                    .with_priority(Priority::Low)
                    .with_category(Category::Shopping),
                false,
            ),
            task(
                TaskSubmission::new("Groceries")
                    .with_description("eggs, milk, bread")
                    .with_category(Category::Shopping),
                true,
            ),
            task(
                TaskSubmission::new("Quarterly report")
                    .with_priority(Priority::High)
                    .with_category(Category::Work),
                false,
            ),
            task(
                TaskSubmission::new("Run 5k")
                    .with_priority(Priority::High)
                    .with_category(Category::Health),
                true,
            ),
        ]
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let tasks = sample();
        let filter = TaskFilter::new();
        assert!(filter.is_empty());
        assert_eq!(apply(&tasks, &filter).len(), tasks.len());
    }

    #[test]
    fn test_search_title_and_description() {
        let tasks = sample();
        let filter = TaskFilter::new().with_search("Milk");
        assert_eq!(
            titles(&apply(&tasks, &filter)),
            vec!["Buy MILK", "Groceries"]
        );
    }

    #[test]
    fn test_search_without_description_matches_title_only() {
        let tasks = sample();
        let filter = TaskFilter::new().with_search("eggs");
        assert_eq!(titles(&apply(&tasks, &filter)), vec!["Groceries"]);

        let filter = TaskFilter::new().with_search("nothing here");
        assert!(apply(&tasks, &filter).is_empty());
    }

    #[test]
    fn test_status_filter() {
        let tasks = sample();
        let active = TaskFilter::new().with_status(StatusFilter::Active);
        assert_eq!(
            titles(&apply(&tasks, &active)),
            vec!["Buy MILK", "Quarterly report"]
        );

        let completed = TaskFilter::new().with_status(StatusFilter::Completed);
        assert_eq!(
            titles(&apply(&tasks, &completed)),
            vec!["Groceries", "Run 5k"]
        );
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        let tasks = sample();
        let filter = TaskFilter::new()
            .with_priority(Priority::High)
            .with_status(StatusFilter::Active);
        assert_eq!(titles(&apply(&tasks, &filter)), vec!["Quarterly report"]);

        let filter = TaskFilter::new()
            .with_category(Category::Shopping)
            .with_search("milk")
            .with_status(StatusFilter::Completed);
        assert_eq!(titles(&apply(&tasks, &filter)), vec!["Groceries"]);

        let filter = TaskFilter::new()
            .with_category(Category::Work)
            .with_priority(Priority::Low);
        assert!(apply(&tasks, &filter).is_empty());
    }

    #[test]
    fn test_matches_single_task() {
        let tasks = sample();
        let filter = TaskFilter::new()
            .with_search("EGGS")
            .with_status(StatusFilter::Completed);
        assert!(!filter.matches(&tasks[0]));
        assert!(filter.matches(&tasks[1]));
        assert!(TaskFilter::new().matches(&tasks[3]));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let tasks = sample();
        let filters = [
            TaskFilter::new(),
            TaskFilter::new().with_search("milk"),
            TaskFilter::new().with_status(StatusFilter::Completed),
            TaskFilter::new()
                .with_priority(Priority::High)
                .with_category(Category::Health),
        ];
        for filter in filters {
            let once = apply(&tasks, &filter);
            let twice = apply(once.iter().copied(), &filter);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_filter_json_shape() {
        let filter: TaskFilter =
            serde_json::from_str(r#"{"search": "milk", "status": "active"}"#).unwrap();
        assert_eq!(
            filter,
            TaskFilter::new()
                .with_search("milk")
                .with_status(StatusFilter::Active)
        );

        let filter: TaskFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.is_empty());
    }
}
