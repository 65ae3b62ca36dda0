//! TaskService - タスクの変更操作
//!
//! # 設計原則
//! - 履歴エントリを先に計算し、patch 1 回で書き込む（タスクを中途半端な状態にしない）
//! - 結果は Notifier への通知とログの両方で報告
//! - バリデーションエラーは通知せずフォームに返す

use std::sync::Arc;

use crate::domain::{
    NewTask, Operation, ProposedChanges, StoreError, Task, TaskError, TaskId, TaskStatus,
    record_changes,
};
use crate::ports::{Clock, Confirm, Notifier, TaskDocument, TaskPatchBuilder, TaskStore};

use super::edit::EditFields;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt; the store was not touched.
    Cancelled,
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    fn fail(&self, operation: Operation, message: &str, id: Option<TaskId>, source: StoreError) -> TaskError {
        match id {
            Some(id) => tracing::error!(task = %id, %operation, error = %source, "store write failed"),
            None => tracing::error!(%operation, error = %source, "store write failed"),
        }
        self.notifier.error(message);
        TaskError::persistence(operation, source)
    }

    pub async fn create_task(&self, new: NewTask) -> Result<TaskId, TaskError> {
        if let Err(err) = new.validate() {
            tracing::warn!(error = %err, "rejected new task");
            return Err(err.into());
        }
        let document = TaskDocument::create(&new, self.clock.now());
        match self.store.create(document).await {
            Ok(id) => {
                tracing::info!(task = %id, priority = %new.priority, "task created");
                self.notifier.success("Task created");
                Ok(id)
            }
            Err(err) => Err(self.fail(Operation::Create, "Failed to create task", None, err)),
        }
    }

    /// Set `completed`, keep `status` in step with it and record the change.
    pub async fn toggle_completion(&self, task: &Task, completed: bool) -> Result<(), TaskError> {
        let now = self.clock.now();
        let entries = record_changes(task, &ProposedChanges::new().completed(completed), now);

        let patch = TaskPatchBuilder::new()
            .completed(completed)
            .status(TaskStatus::for_completion(completed))
            .updated_at(now)
            .history(task.history.iter().chain(&entries))
            .build();

        if let Err(err) = self.store.update(task.id, patch).await {
            return Err(self.fail(Operation::Update, "Failed to update task", Some(task.id), err));
        }

        tracing::info!(task = %task.id, completed, changes = entries.len(), "completion toggled");
        self.notifier.success(if completed {
            "Task completed"
        } else {
            "Task uncompleted"
        });
        Ok(())
    }

    /// Delete after the user confirms. No retry on failure.
    pub async fn delete_task(&self, id: TaskId, confirm: &dyn Confirm) -> Result<DeleteOutcome, TaskError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(task = %id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        if let Err(err) = self.store.delete(id).await {
            return Err(self.fail(Operation::Delete, "Failed to delete task", Some(id), err));
        }
        tracing::info!(task = %id, "task deleted");
        self.notifier.success("Task deleted successfully");
        Ok(DeleteOutcome::Deleted)
    }

    /// Save the edit form: validate, diff, then write fields and history together.
    pub async fn edit_task(&self, task: &Task, fields: &EditFields) -> Result<(), TaskError> {
        let edit = match fields.validate() {
            Ok(edit) => edit,
            Err(err) => {
                tracing::warn!(task = %task.id, error = %err, "rejected edit");
                return Err(err.into());
            }
        };

        let now = self.clock.now();
        let proposed = ProposedChanges::new()
            .title(edit.title.clone())
            .description(edit.description.clone())
            .priority(edit.priority)
            .due_date(edit.due_date);
        let entries = record_changes(task, &proposed, now);

        let patch = TaskPatchBuilder::new()
            .title(edit.title)
            .description(edit.description)
            .priority(edit.priority)
            .due_date(edit.due_date)
            .updated_at(now)
            .history(task.history.iter().chain(&entries))
            .build();

        if let Err(err) = self.store.update(task.id, patch).await {
            return Err(self.fail(Operation::Update, "Failed to update task", Some(task.id), err));
        }

        tracing::info!(task = %task.id, changes = entries.len(), "task updated");
        self.notifier.success("Task updated successfully");
        Ok(())
    }
}
