//! Task entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HistoryEntry, Priority, TaskId, TaskStatus, ValidationError};

/// One unit of work, as delivered by the store's live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    /// Denormalized label, possibly stale. See [`Task::effective_status`].
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Append-only, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl Task {
    /// Incomplete and past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && now > self.due_date
    }

    /// Status computed from `completed` and `due_date` instead of the stored label.
    pub fn effective_status(&self, now: DateTime<Utc>) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else if self.is_overdue(now) {
            TaskStatus::Overdue
        } else {
            TaskStatus::Pending
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            due_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(Some(description.into()));
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

/// Titles must contain something other than whitespace.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(())
}

/// An empty description is the same as no description.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    pub fn task(title: &str, priority: Priority, due_date: DateTime<Utc>) -> Task {
        let created = date(2023, 12, 1);
        Task {
            id: TaskId::from_ulid(Ulid::new()),
            title: title.to_string(),
            description: None,
            priority,
            due_date,
            completed: false,
            status: TaskStatus::Pending,
            created_at: created,
            updated_at: created,
            history: Vec::new(),
        }
    }
}
