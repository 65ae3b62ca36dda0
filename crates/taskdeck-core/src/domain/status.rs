//! Stored task status label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status label persisted alongside `completed`.
///
/// Mutations only ever write `Pending` or `Completed`. `Overdue` can appear in
/// stored data but is never trusted: use [`crate::domain::Task::effective_status`]
/// to get a fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// Status written by mutations for a given completion flag.
    pub fn for_completion(completed: bool) -> Self {
        if completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
            TaskStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
