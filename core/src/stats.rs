//! Summary statistics over the task collection

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// Headline counts for a task collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// High-priority tasks not yet completed
    pub high_priority_active: usize,
    /// Completed share as a whole percentage, 0 for an empty collection
    pub completion_rate: u8,
}

impl TaskStats {
    /// Summarize a collection in a single pass
    pub fn summarize<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut total = 0;
        let mut completed = 0;
        let mut high_priority_active = 0;
        for task in tasks {
            total += 1;
            if task.completed {
                completed += 1;
            } else if task.priority == Priority::High {
                high_priority_active += 1;
            }
        }

        Self {
            total,
            completed,
            active: total - completed,
            high_priority_active,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// Percentage rounded half up
fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u8
}

/// Summarize a collection
pub fn summarize<'a, I>(tasks: I) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    TaskStats::summarize(tasks)
}
