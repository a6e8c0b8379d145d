//! Task model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, TaskField};
use crate::Result;

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    TaskField::Priority,
                    format!("'{}' is not one of low, medium, high", s),
                )
            })
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Personal,
    Work,
    Shopping,
    Health,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Self::Personal
    }
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Personal,
        Self::Work,
        Self::Shopping,
        Self::Health,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Shopping => "shopping",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    TaskField::Category,
                    format!(
                        "'{}' is not one of personal, work, shopping, health, other",
                        s
                    ),
                )
            })
    }
}

/// A single to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new, not yet completed task from validated details
    pub fn new(details: TaskDetails) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: details.title,
            description: details.description,
            completed: false,
            priority: details.priority,
            category: details.category,
            due_date: details.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping id, creation time and completion
    pub fn apply(&mut self, details: TaskDetails) {
        self.title = details.title;
        self.description = details.description;
        self.priority = details.priority;
        self.category = details.category;
        self.due_date = details.due_date;
        self.touch();
    }

    /// Flip the completion flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    /// Refresh `updated_at`, never moving it backwards
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Short due date label such as "Mar 07"
    pub fn due_label(&self) -> Option<String> {
        self.due_date.map(|date| date.format("%b %d").to_string())
    }

    /// True if the search text occurs in the title or description, ignoring case
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle_lower))
    }
}

/// The validated, mutable fields of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDate>,
}

/// A candidate create/edit submission from the presentation layer
///
/// Enumerations and the due date arrive as text and are checked by
/// [`TaskSubmission::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

fn default_priority() -> String {
    Priority::default().as_str().to_string()
}

fn default_category() -> String {
    Category::default().as_str().to_string()
}

impl TaskSubmission {
    /// Create a submission with the given title and form defaults
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: default_priority(),
            category: default_category(),
            due_date: None,
        }
    }

    /// Pre-fill a submission from an existing task, for editing
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority.as_str().to_string(),
            category: task.category.as_str().to_string(),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority.as_str().to_string();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category.as_str().to_string();
        self
    }

    /// Set the due date, as an ISO-8601 date
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Check every field, returning the first violation
    pub fn validate(&self) -> Result<TaskDetails> {
        if self.title.trim().is_empty() {
            return Err(Error::validation(TaskField::Title, "Title is required"));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(Error::validation(
                TaskField::Title,
                format!("Title must be at most {} characters", MAX_TITLE_CHARS),
            ));
        }

        let description = self.description.clone().filter(|d| !d.is_empty());
        if description
            .as_deref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_CHARS)
        {
            return Err(Error::validation(
                TaskField::Description,
                format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_CHARS
                ),
            ));
        }

        let priority = self.priority.parse::<Priority>()?;
        let category = self.category.parse::<Category>()?;

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_due_date(raw).ok_or_else(|| {
                Error::validation(
                    TaskField::DueDate,
                    format!("'{}' is not a valid calendar date", raw),
                )
            })?),
        };

        Ok(TaskDetails {
            title: self.title.clone(),
            description,
            priority,
            category,
            due_date,
        })
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or a full RFC 3339 timestamp
///
/// A timestamp is read in the local timezone, since browser-written due dates
/// are local midnight serialized as UTC.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|value| value.with_timezone(&Local).date_naive())
    })
}

/// Local midnight of `date` as a UTC timestamp, the form browsers persist
#[cfg(test)]
pub(crate) fn local_midnight_utc(date: NaiveDate) -> String {
    use chrono::{SecondsFormat, TimeZone};

    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => super::parse_due_date(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid dueDate: {}", raw))),
        }
    }
}
