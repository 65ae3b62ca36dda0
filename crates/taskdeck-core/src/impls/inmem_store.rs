//! In-memory TaskStore（開発・テスト・CLI 用）
//!
//! # 実装
//! - ドキュメントは `BTreeMap` に保持し、tokio の `Mutex` で保護
//! - 書き込みが成功するたびにコレクション全体をデコードし、`watch` channel で push
//! - `fail_writes` / `break_feed` でエラー経路を再現できる
//!
//! # Thread Safety
//! - `Send + Sync`。アクティブな購読数は `AtomicUsize` で数える

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use crate::domain::{StoreError, Task, TaskId};
use crate::ports::{
    IdGenerator, OrderBy, Snapshot, Subscription, SystemClock, TaskDocument, TaskPatch, TaskStore,
    UlidGenerator,
};

struct InMemoryStoreState {
    documents: BTreeMap<TaskId, TaskDocument>,

    /// When set, every write fails with `Unavailable(reason)`.
    failing: Option<String>,
}

impl InMemoryStoreState {
    fn snapshot(&self) -> Snapshot {
        self.documents
            .iter()
            .map(|(id, doc)| doc.decode(*id))
            .collect::<Result<Vec<Task>, _>>()
            .map(Arc::new)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        match &self.failing {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

pub struct InMemoryTaskStore {
    state: Mutex<InMemoryStoreState>,
    feed: watch::Sender<Snapshot>,
    subscribers: Arc<AtomicUsize>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UlidGenerator::new(SystemClock)))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self::from_state(
            InMemoryStoreState {
                documents: BTreeMap::new(),
                failing: None,
            },
            ids,
        )
    }

    /// Seed the store with existing documents.
    pub fn with_documents(documents: impl IntoIterator<Item = (TaskId, TaskDocument)>) -> Self {
        Self::from_state(
            InMemoryStoreState {
                documents: documents.into_iter().collect(),
                failing: None,
            },
            Arc::new(UlidGenerator::new(SystemClock)),
        )
    }

    fn from_state(state: InMemoryStoreState, ids: Arc<dyn IdGenerator>) -> Self {
        let (feed, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            feed,
            subscribers: Arc::new(AtomicUsize::new(0)),
            ids,
        }
    }

    /// Copy of every stored document, keyed by id.
    pub async fn documents(&self) -> BTreeMap<TaskId, TaskDocument> {
        self.state.lock().await.documents.clone()
    }

    /// Number of live subscriptions not yet dropped.
    pub fn active_subscriptions(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    /// Make every following write fail until [`InMemoryTaskStore::recover`].
    pub async fn fail_writes(&self, reason: impl Into<String>) {
        self.state.lock().await.failing = Some(reason.into());
    }

    pub async fn recover(&self) {
        self.state.lock().await.failing = None;
    }

    /// Push an error to every subscriber, as a dropped backend connection would.
    pub fn break_feed(&self, error: StoreError) {
        self.feed.send_replace(Err(error));
    }

    fn publish(&self, state: &InMemoryStoreState) {
        self.feed.send_replace(state.snapshot());
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn subscribe(&self, order: OrderBy) -> Result<Subscription, StoreError> {
        let feed = self.feed.subscribe();
        self.subscribers.fetch_add(1, Ordering::SeqCst);
        let subscribers = Arc::clone(&self.subscribers);
        tracing::debug!(field = %order.field, direction = %order.direction, "subscription opened");
        Ok(Subscription::new(order, feed, move || {
            subscribers.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("subscription released");
        }))
    }

    async fn create(&self, document: TaskDocument) -> Result<TaskId, StoreError> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let id = self.ids.generate_task_id();
        state.documents.insert(id, document);
        self.publish(&state);
        Ok(id)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let document = state
            .documents
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        document.apply(&patch);
        self.publish(&state);
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        if state.documents.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.publish(&state);
        Ok(())
    }
}
