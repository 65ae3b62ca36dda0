//! Store-native representation of tasks.
//!
//! The store keeps instants as `{seconds, nanoseconds}` timestamps and history
//! values as untyped JSON. Everything here converts between that shape and the
//! typed domain model; decoding failures surface as `StoreError::Decode`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    FieldChange, HistoryEntry, NewTask, Priority, StoreError, Task, TaskId, TaskStatus,
};

/// Store timestamp: seconds since the Unix epoch plus sub-second nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl StoreTimestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl From<DateTime<Utc>> for StoreTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanoseconds: value.timestamp_subsec_nanos(),
        }
    }
}

/// History entry as stored: field name plus untyped old/new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDocument {
    pub timestamp: StoreTimestamp,
    pub field: String,
    #[serde(default)]
    pub old_value: Value,
    #[serde(default)]
    pub new_value: Value,
}

/// Task as stored. The id lives outside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: StoreTimestamp,
    pub status: TaskStatus,
    pub completed: bool,
    pub created_at: StoreTimestamp,
    pub updated_at: StoreTimestamp,
    #[serde(default)]
    pub history: Vec<HistoryDocument>,
}

fn decode_error(id: &TaskId, reason: impl Into<String>) -> StoreError {
    StoreError::Decode {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn instant(id: &TaskId, field: &str, ts: StoreTimestamp) -> Result<DateTime<Utc>, StoreError> {
    ts.to_datetime()
        .ok_or_else(|| decode_error(id, format!("{field} timestamp out of range")))
}

fn value<T: DeserializeOwned>(id: &TaskId, field: &str, v: &Value) -> Result<T, StoreError> {
    serde_json::from_value(v.clone())
        .map_err(|e| decode_error(id, format!("history {field} value: {e}")))
}

fn timestamp_value(id: &TaskId, field: &str, v: &Value) -> Result<DateTime<Utc>, StoreError> {
    let ts: StoreTimestamp = value(id, field, v)?;
    instant(id, field, ts)
}

fn to_value<T: Serialize>(v: T) -> Value {
    // Strings, bools, unit enums and plain structs never fail to serialize.
    serde_json::to_value(v).unwrap_or(Value::Null)
}

impl HistoryDocument {
    pub fn encode(entry: &HistoryEntry) -> Self {
        let (old_value, new_value) = match &entry.change {
            FieldChange::Title { old, new } => (to_value(old), to_value(new)),
            FieldChange::Description { old, new } => (to_value(old), to_value(new)),
            FieldChange::Priority { old, new } => (to_value(old), to_value(new)),
            FieldChange::DueDate { old, new } => (
                to_value(StoreTimestamp::from(*old)),
                to_value(StoreTimestamp::from(*new)),
            ),
            FieldChange::Completed { old, new } => (to_value(old), to_value(new)),
        };
        Self {
            timestamp: entry.timestamp.into(),
            field: entry.field().to_string(),
            old_value,
            new_value,
        }
    }

    pub fn decode(&self, id: &TaskId) -> Result<HistoryEntry, StoreError> {
        let field = self.field.as_str();
        let (old, new) = (&self.old_value, &self.new_value);
        let change = match field {
            "title" => FieldChange::Title {
                old: value(id, field, old)?,
                new: value(id, field, new)?,
            },
            "description" => FieldChange::Description {
                old: value(id, field, old)?,
                new: value(id, field, new)?,
            },
            "priority" => FieldChange::Priority {
                old: value(id, field, old)?,
                new: value(id, field, new)?,
            },
            "dueDate" => FieldChange::DueDate {
                old: timestamp_value(id, field, old)?,
                new: timestamp_value(id, field, new)?,
            },
            "completed" => FieldChange::Completed {
                old: value(id, field, old)?,
                new: value(id, field, new)?,
            },
            other => return Err(decode_error(id, format!("unknown history field {other:?}"))),
        };
        Ok(HistoryEntry::new(instant(id, "history", self.timestamp)?, change))
    }
}

impl TaskDocument {
    /// Fresh document for a new task: incomplete, pending, no history.
    pub fn create(task: &NewTask, now: DateTime<Utc>) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date.into(),
            status: TaskStatus::Pending,
            completed: false,
            created_at: now.into(),
            updated_at: now.into(),
            history: Vec::new(),
        }
    }

    pub fn encode(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date.into(),
            status: task.status,
            completed: task.completed,
            created_at: task.created_at.into(),
            updated_at: task.updated_at.into(),
            history: task.history.iter().map(HistoryDocument::encode).collect(),
        }
    }

    pub fn decode(&self, id: TaskId) -> Result<Task, StoreError> {
        let history = self
            .history
            .iter()
            .map(|h| h.decode(&id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Task {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: instant(&id, "dueDate", self.due_date)?,
            completed: self.completed,
            status: self.status,
            created_at: instant(&id, "createdAt", self.created_at)?,
            updated_at: instant(&id, "updatedAt", self.updated_at)?,
            history,
        })
    }

    /// Merge a partial update. Only fields present in the patch change.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
        if let Some(history) = &patch.history {
            self.history = history.clone();
        }
    }
}

/// Field-level partial update. Unset fields are left out of the write.
///
/// `history` replaces the stored array wholesale: writers send the full
/// merged history, so two writers racing on the same task is last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<StoreTimestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<StoreTimestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryDocument>>,
}

pub struct TaskPatchBuilder(TaskPatch);

impl TaskPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.0.due_date = Some(due_date.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.0.completed = Some(completed);
        self
    }

    #[must_use]
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.0.updated_at = Some(updated_at.into());
        self
    }

    /// Full history to store: the existing entries followed by the new ones.
    #[must_use]
    pub fn history<'a>(mut self, history: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        self.0.history = Some(history.into_iter().map(HistoryDocument::encode).collect());
        self
    }

    #[must_use]
    pub fn build(self) -> TaskPatch {
        self.0
    }
}

impl Default for TaskPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{date, task};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use ulid::Ulid;

    #[test]
    fn timestamps_keep_the_same_instant() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap() + Duration::nanoseconds(123_456_789);
        let ts = StoreTimestamp::from(at);
        assert_eq!(ts.nanoseconds, 123_456_789);
        assert_eq!(ts.to_datetime(), Some(at));
    }

    #[test]
    fn decodes_document_from_store_json() {
        let raw = json!({
            "title": "Pay rent",
            "priority": "High",
            "dueDate": { "seconds": 1704067200, "nanoseconds": 0 },
            "status": "Pending",
            "completed": false,
            "createdAt": { "seconds": 1701388800, "nanoseconds": 0 },
            "updatedAt": { "seconds": 1701388800, "nanoseconds": 500000000 },
            "history": [
                {
                    "timestamp": { "seconds": 1701388800, "nanoseconds": 0 },
                    "field": "dueDate",
                    "oldValue": { "seconds": 1703980800, "nanoseconds": 0 },
                    "newValue": { "seconds": 1704067200, "nanoseconds": 0 }
                },
                {
                    "timestamp": { "seconds": 1701388800, "nanoseconds": 0 },
                    "field": "description",
                    "oldValue": null,
                    "newValue": "landlord"
                }
            ]
        });
        let doc: TaskDocument = serde_json::from_value(raw).unwrap();
        let id = TaskId::from_ulid(Ulid::new());

        let task = doc.decode(id).unwrap();

        assert_eq!(task.id, id);
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, date(2024, 1, 1));
        assert_eq!(task.updated_at, date(2023, 12, 1) + Duration::milliseconds(500));
        assert_eq!(
            task.history[0].change,
            FieldChange::DueDate {
                old: date(2023, 12, 31),
                new: date(2024, 1, 1)
            }
        );
        assert_eq!(
            task.history[1].change,
            FieldChange::Description {
                old: None,
                new: Some("landlord".into())
            }
        );
    }

    #[test]
    fn missing_history_decodes_as_empty() {
        let raw = json!({
            "title": "Pay rent",
            "priority": "Low",
            "dueDate": { "seconds": 0, "nanoseconds": 0 },
            "status": "Pending",
            "completed": false,
            "createdAt": { "seconds": 0, "nanoseconds": 0 },
            "updatedAt": { "seconds": 0, "nanoseconds": 0 }
        });
        let doc: TaskDocument = serde_json::from_value(raw).unwrap();
        assert!(doc.decode(TaskId::from_ulid(Ulid::new())).unwrap().history.is_empty());
    }

    #[test]
    fn mistyped_history_value_is_a_decode_error() {
        let mut doc = TaskDocument::encode(&task("Pay rent", Priority::High, date(2024, 1, 1)));
        doc.history.push(HistoryDocument {
            timestamp: date(2024, 1, 2).into(),
            field: "completed".into(),
            old_value: json!("no"),
            new_value: json!(true),
        });

        let err = doc.decode(TaskId::from_ulid(Ulid::new())).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn encoded_task_decodes_to_itself() {
        let mut t = task("Pay rent", Priority::High, date(2024, 1, 1));
        t.history.push(HistoryEntry::new(
            date(2024, 1, 2),
            FieldChange::Priority {
                old: Priority::Low,
                new: Priority::High,
            },
        ));
        assert_eq!(TaskDocument::encode(&t).decode(t.id).unwrap(), t);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatchBuilder::new()
            .completed(true)
            .status(TaskStatus::Completed)
            .build();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "completed": true, "status": "Completed" })
        );
    }

    #[test]
    fn apply_merges_patch_fields() {
        let t = task("Pay rent", Priority::High, date(2024, 1, 1));
        let mut doc = TaskDocument::encode(&t);
        let patch = TaskPatchBuilder::new()
            .description(Some("landlord".into()))
            .updated_at(date(2024, 1, 3))
            .build();

        doc.apply(&patch);

        let after = doc.decode(t.id).unwrap();
        assert_eq!(after.description.as_deref(), Some("landlord"));
        assert_eq!(after.updated_at, date(2024, 1, 3));
        assert_eq!(after.title, t.title);
    }
}
