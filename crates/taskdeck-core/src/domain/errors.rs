//! Errors - エラー型と分類
//!
//! - `ValidationError`: 入力エラー。ストアには届かない
//! - `StoreError`: `TaskStore` 実装が返すエラー
//! - `TaskError`: 変更操作・ビュー・編集セッションが返すエラー

use thiserror::Error;

use super::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("due date is required")]
    MissingDueDate,

    #[error("due date {0:?} is not a valid yyyy-mm-dd date")]
    InvalidDueDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} does not exist")]
    NotFound(TaskId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("cannot decode {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("subscription closed")]
    Closed,
}

/// Which store write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to {operation} task: {source}")]
    Persistence {
        operation: Operation,
        #[source]
        source: StoreError,
    },

    #[error("task feed failed: {0}")]
    Subscription(#[source] StoreError),

    #[error("{0} not found")]
    NotFound(TaskId),

    #[error("edit form for {0} is closed")]
    EditClosed(TaskId),

    #[error("a save for {0} is already in progress")]
    EditInProgress(TaskId),
}

impl TaskError {
    pub fn persistence(operation: Operation, source: StoreError) -> Self {
        TaskError::Persistence { operation, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}
