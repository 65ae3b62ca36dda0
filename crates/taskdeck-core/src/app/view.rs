//! Task list view.
//!
//! A view owns exactly one store subscription for as long as it lives. The
//! subscription is re-acquired when the store-side order changes (sort primary
//! key or direction) and released when the view is dropped, so a closed view
//! never receives another snapshot.

use std::sync::Arc;

use crate::domain::{Task, TaskError, TaskId};
use crate::listing::{DEFAULT_PAGE_SIZE, DerivedPage, SortConfig, derive};
use crate::ports::{Notifier, OrderBy, Subscription, TaskStore};

/// User-controlled list settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub search: String,
    pub sort: SortConfig,
    /// 1-based; clamped when the page is derived.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortConfig::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn store_order(sort: &SortConfig) -> OrderBy {
    OrderBy::new(sort.primary, sort.direction)
}

pub struct TaskListView {
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    subscription: Subscription,
    tasks: Vec<Task>,
    state: ListState,
}

impl TaskListView {
    pub async fn open(
        store: Arc<dyn TaskStore>,
        notifier: Arc<dyn Notifier>,
        state: ListState,
    ) -> Result<Self, TaskError> {
        let mut subscription = match store.subscribe(store_order(&state.sort)).await {
            Ok(subscription) => subscription,
            Err(err) => return Err(feed_failed(notifier.as_ref(), err)),
        };
        let tasks = match subscription.current() {
            Ok(tasks) => tasks,
            Err(err) => return Err(feed_failed(notifier.as_ref(), err)),
        };
        tracing::debug!(tasks = tasks.len(), "task list opened");
        Ok(Self {
            store,
            notifier,
            subscription,
            tasks,
            state,
        })
    }

    /// Wait for the store to push the next snapshot and take it.
    pub async fn refresh(&mut self) -> Result<(), TaskError> {
        match self.subscription.changed().await {
            Ok(tasks) => {
                tracing::debug!(tasks = tasks.len(), "task list refreshed");
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => Err(feed_failed(self.notifier.as_ref(), err)),
        }
    }

    /// Latest snapshot in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Result<&Task, TaskError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn subscription_order(&self) -> OrderBy {
        self.subscription.order()
    }

    /// The page to render for the current settings.
    pub fn page(&self) -> DerivedPage {
        derive(
            &self.tasks,
            &self.state.search,
            &self.state.sort,
            self.state.page,
            self.state.page_size,
        )
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    /// Change sorting. Resubscribes when the store order changes; on failure
    /// the previous subscription and settings stay in place.
    pub async fn set_sort(&mut self, sort: SortConfig) -> Result<(), TaskError> {
        let order = store_order(&sort);
        if order != self.subscription.order() {
            let mut subscription = match self.store.subscribe(order).await {
                Ok(subscription) => subscription,
                Err(err) => return Err(feed_failed(self.notifier.as_ref(), err)),
            };
            let tasks = match subscription.current() {
                Ok(tasks) => tasks,
                Err(err) => return Err(feed_failed(self.notifier.as_ref(), err)),
            };
            tracing::debug!(field = %order.field, direction = %order.direction, "resubscribed");
            self.subscription = subscription;
            self.tasks = tasks;
        }
        self.state.sort = sort;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
    }

    /// Step from the page currently shown, not from the raw requested one.
    pub fn next_page(&mut self) {
        let shown = self.page();
        self.state.page = shown.page.saturating_add(1).min(shown.total_pages);
    }

    pub fn previous_page(&mut self) {
        let shown = self.page();
        self.state.page = shown.page.saturating_sub(1).max(1);
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.state.page = 1;
    }
}

fn feed_failed(notifier: &dyn Notifier, err: crate::domain::StoreError) -> TaskError {
    tracing::error!(error = %err, "task feed failed");
    notifier.error("Lost connection to the task list");
    TaskError::Subscription(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::date;
    use crate::domain::{NewTask, Priority, StoreError};
    use crate::impls::{InMemoryTaskStore, Notification, RecordingNotifier};
    use crate::listing::{SortDirection, SortKey};
    use crate::ports::{TaskDocument, TaskStore};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    async fn seeded(n: usize) -> Arc<InMemoryTaskStore> {
        let store = Arc::new(InMemoryTaskStore::new());
        for i in 0..n {
            let priority = Priority::ALL[i % 3];
            let new = NewTask::new(
                format!("task {i:02}"),
                priority,
                date(2024, 1, 1) + Duration::days(i as i64),
            );
            store
                .create(TaskDocument::create(&new, date(2023, 12, 1)))
                .await
                .unwrap();
        }
        store
    }

    async fn open(store: &Arc<InMemoryTaskStore>) -> TaskListView {
        TaskListView::open(
            store.clone(),
            Arc::new(RecordingNotifier::new()),
            ListState::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn view_holds_one_subscription_and_releases_it_on_drop() {
        let store = seeded(3).await;
        let view = open(&store).await;
        assert_eq!(store.active_subscriptions(), 1);

        drop(view);
        assert_eq!(store.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn changing_primary_key_swaps_the_subscription() {
        let store = seeded(3).await;
        let mut view = open(&store).await;

        view.set_sort(SortConfig::new(SortKey::Priority)).await.unwrap();

        assert_eq!(store.active_subscriptions(), 1);
        assert_eq!(view.subscription_order().field, SortKey::Priority);

        // secondary key only changes the client-side sort
        view.set_sort(SortConfig::new(SortKey::Priority).then_by(SortKey::DueDate))
            .await
            .unwrap();
        assert_eq!(view.subscription_order().field, SortKey::Priority);
        assert_eq!(view.state().sort.secondary, Some(SortKey::DueDate));
    }

    #[tokio::test]
    async fn page_follows_list_state() {
        let store = seeded(23).await;
        let mut view = open(&store).await;

        view.set_page(3);
        let page = view.page();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.tasks.len(), 3);

        view.next_page();
        assert_eq!(view.state().page, 3);

        view.set_page_size(5);
        assert_eq!(view.state().page, 1);
        assert_eq!(view.page().total_pages, 5);

        view.previous_page();
        assert_eq!(view.state().page, 1);
    }

    #[tokio::test]
    async fn paging_from_an_out_of_range_request_steps_from_the_last_page() {
        let store = seeded(23).await;
        let mut view = open(&store).await;

        view.set_page(usize::MAX);
        assert_eq!(view.page().page, 3);

        view.next_page();
        assert_eq!(view.state().page, 3);

        view.set_page(usize::MAX);
        view.previous_page();
        assert_eq!(view.state().page, 2);
    }

    #[tokio::test]
    async fn descending_due_date_lists_latest_first() {
        let store = seeded(4).await;
        let mut view = open(&store).await;

        view.set_sort(SortConfig::new(SortKey::DueDate).direction(SortDirection::Desc))
            .await
            .unwrap();

        let titles: Vec<_> = view.page().tasks.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["task 03", "task 02", "task 01", "task 00"]);
    }

    #[tokio::test]
    async fn refresh_picks_up_store_writes() {
        let store = seeded(1).await;
        let mut view = open(&store).await;

        let new = NewTask::new("Buy milk", Priority::Low, date(2024, 6, 1));
        store
            .create(TaskDocument::create(&new, date(2024, 1, 1)))
            .await
            .unwrap();
        view.refresh().await.unwrap();

        view.set_search("milk");
        let page = view.page();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.tasks[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn feed_failure_is_reported() {
        let store = seeded(1).await;
        let notifier = Arc::new(RecordingNotifier::new());
        let mut view = TaskListView::open(store.clone(), notifier.clone(), ListState::default())
            .await
            .unwrap();

        store.break_feed(StoreError::Unavailable("connection reset".into()));
        let err = view.refresh().await.unwrap_err();

        assert!(matches!(err, TaskError::Subscription(_)));
        assert_eq!(
            notifier.take(),
            vec![Notification::Error("Lost connection to the task list".into())]
        );
    }
}
