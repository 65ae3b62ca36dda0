//! TaskStore port - 外部ドキュメントストアが実装する正本（source of truth）
//!
//! TaskStore は以下を扱います：
//! - 購読（変更のたびにコレクション全体を push）
//! - 作成（ドキュメント全体）
//! - 更新（フィールド単位の patch）
//! - 削除
//!
//! # Subscription
//! [`Subscription`] は所有ハンドルです。`Drop` で購読が解放され、
//! 解放後の snapshot は届きません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::document::{TaskDocument, TaskPatch};
use crate::domain::{StoreError, Task, TaskId};
use crate::listing::{SortDirection, SortKey};

/// Order the store delivers the collection in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: SortKey,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: SortKey, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Sort a snapshot in place. Priority sorts by its natural `Low < High` order.
    pub fn apply(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| {
            let ord = match self.field {
                SortKey::Priority => a.priority.cmp(&b.priority),
                SortKey::DueDate => a.due_date.cmp(&b.due_date),
            };
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

/// What the live feed carries: the whole collection, or the error that broke it.
pub type Snapshot = Result<Arc<Vec<Task>>, StoreError>;

/// Live view of the collection. Dropping it releases the subscription.
pub struct Subscription {
    order: OrderBy,
    feed: watch::Receiver<Snapshot>,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(
        order: OrderBy,
        feed: watch::Receiver<Snapshot>,
        release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            order,
            feed,
            release: Some(Box::new(release)),
        }
    }

    pub fn order(&self) -> OrderBy {
        self.order
    }

    /// The latest snapshot, ordered as requested. Marks it as seen.
    pub fn current(&mut self) -> Result<Vec<Task>, StoreError> {
        let snapshot = self.feed.borrow_and_update().clone();
        let mut tasks = snapshot?.as_ref().clone();
        self.order.apply(&mut tasks);
        Ok(tasks)
    }

    /// Wait for the next pushed snapshot.
    pub async fn changed(&mut self) -> Result<Vec<Task>, StoreError> {
        self.feed.changed().await.map_err(|_| StoreError::Closed)?;
        self.current()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// TaskStore はタスクの正本（source of truth）
///
/// # 設計原則
/// - 1 回の変更操作は 1 回の書き込み（create / update / delete）
/// - 同時編集は document 単位で last-write-wins
///
/// # Thread Safety
/// - `Send + Sync` を要求（service と view で共有される）
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Start a live subscription to the whole collection.
    async fn subscribe(&self, order: OrderBy) -> Result<Subscription, StoreError>;

    /// Insert a document; the store assigns the id.
    async fn create(&self, document: TaskDocument) -> Result<TaskId, StoreError>;

    /// Merge a partial update into an existing document.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError>;

    /// Remove a document permanently.
    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;
}
