//! Error types for the core library

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Submission field named by a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Title,
    Description,
    Priority,
    Category,
    DueDate,
}

impl TaskField {
    /// Wire name of the field, as used in the persisted record
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Priority => "priority",
            Self::Category => "category",
            Self::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {field}: {reason}")]
    Validation { field: TaskField, reason: String },

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a Validation error for the given field
    pub fn validation(field: TaskField, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// The offending field, for validation errors
    pub fn field(&self) -> Option<TaskField> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }

    /// True for failures writing to or reading from the key-value slot
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io(_) | Self::Serialization(_)
        )
    }
}
