//! Change history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Priority;

/// Display format for calendar dates in history lines.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Display format for the moment a change was captured.
pub const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %H:%M";

/// One recorded field change, keyed by field with a typed old/new pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldChange {
    Title { old: String, new: String },
    Description { old: Option<String>, new: Option<String> },
    Priority { old: Priority, new: Priority },
    DueDate { old: DateTime<Utc>, new: DateTime<Utc> },
    Completed { old: bool, new: bool },
}

impl FieldChange {
    /// Wire name of the changed attribute.
    pub fn field(&self) -> &'static str {
        match self {
            FieldChange::Title { .. } => "title",
            FieldChange::Description { .. } => "description",
            FieldChange::Priority { .. } => "priority",
            FieldChange::DueDate { .. } => "dueDate",
            FieldChange::Completed { .. } => "completed",
        }
    }

    /// Old and new values rendered for display.
    pub fn display_values(&self) -> (String, String) {
        match self {
            FieldChange::Title { old, new } => (old.clone(), new.clone()),
            FieldChange::Description { old, new } => (
                old.clone().unwrap_or_default(),
                new.clone().unwrap_or_default(),
            ),
            FieldChange::Priority { old, new } => (old.to_string(), new.to_string()),
            FieldChange::DueDate { old, new } => (
                old.format(DATE_FORMAT).to_string(),
                new.format(DATE_FORMAT).to_string(),
            ),
            FieldChange::Completed { old, new } => (old.to_string(), new.to_string()),
        }
    }
}

/// Immutable record of one field's change.
///
/// Ordering within a task's history is the sequence position, not the
/// timestamp: entries produced by one mutation share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub change: FieldChange,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, change: FieldChange) -> Self {
        Self { timestamp, change }
    }

    pub fn field(&self) -> &'static str {
        self.change.field()
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (old, new) = self.change.display_values();
        write!(
            f,
            "{} - Changed {} from {} to {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.field(),
            old,
            new
        )
    }
}
