//! History recorder - 変更履歴の計算
//!
//! 提案された値と現在のタスクを比べ、値が異なるフィールドごとに
//! エントリを 1 つ作ります。
//!
//! # 実装
//! - 比較順は title, description, priority, dueDate, completed
//! - 日時はミリ秒単位で比較
//! - 永続化は呼び出し側（`task.history` に追記して書き込む）

use chrono::{DateTime, Utc};

use super::{FieldChange, HistoryEntry, Priority, Task};

/// Proposed new values for the audited fields. Unset fields are not compared.
///
/// `description` is `Some(None)` when the caller wants the description cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposedChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl ProposedChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Compare `proposed` against `task` and return one entry per differing field.
///
/// Fields are checked in the order title, description, priority, dueDate,
/// completed. Dates are equal when they denote the same millisecond. Every
/// entry is stamped with `at`.
pub fn record_changes(task: &Task, proposed: &ProposedChanges, at: DateTime<Utc>) -> Vec<HistoryEntry> {
    let mut changes = Vec::new();

    if let Some(title) = &proposed.title
        && *title != task.title
    {
        changes.push(FieldChange::Title {
            old: task.title.clone(),
            new: title.clone(),
        });
    }

    if let Some(description) = &proposed.description
        && *description != task.description
    {
        changes.push(FieldChange::Description {
            old: task.description.clone(),
            new: description.clone(),
        });
    }

    if let Some(priority) = proposed.priority
        && priority != task.priority
    {
        changes.push(FieldChange::Priority {
            old: task.priority,
            new: priority,
        });
    }

    if let Some(due_date) = proposed.due_date
        && due_date.timestamp_millis() != task.due_date.timestamp_millis()
    {
        changes.push(FieldChange::DueDate {
            old: task.due_date,
            new: due_date,
        });
    }

    if let Some(completed) = proposed.completed
        && completed != task.completed
    {
        changes.push(FieldChange::Completed {
            old: task.completed,
            new: completed,
        });
    }

    changes
        .into_iter()
        .map(|change| HistoryEntry::new(at, change))
        .collect()
}
