use crate::api::{ApiResult, DashboardApi, Listing, TopicApi};
use forum_core::models::{Page, Post, Topic};
use forum_core::{Completion, DashboardScope, PageQuery, ResourceList};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

type PageFetcher<T> = Arc<dyn Fn(PageQuery) -> BoxFuture<'static, ApiResult<Page<T>>> + Send + Sync>;

/// Runs a [`ResourceList`] against the network.
///
/// The state lock is never held while a request is in flight, so several
/// refreshes may overlap; the list itself keeps only the newest answer.
pub struct ListDriver<T> {
    label: String,
    state: Arc<Mutex<ResourceList<T>>>,
    fetch: PageFetcher<T>,
}

impl<T> Clone for ListDriver<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            state: self.state.clone(),
            fetch: self.fetch.clone(),
        }
    }
}

impl<T: Send + 'static> ListDriver<T> {
    pub fn new<F, Fut>(label: impl Into<String>, page_size: u32, fetch: F) -> Self
    where
        F: Fn(PageQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Page<T>>> + Send + 'static,
    {
        let fetch: PageFetcher<T> = Arc::new(move |query| Box::pin(fetch(query)));
        Self {
            label: label.into(),
            state: Arc::new(Mutex::new(ResourceList::new(page_size))),
            fetch,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetches the current page. Returns `false` when a newer fetch won.
    ///
    /// If the page turned out to be past the end, the last page is fetched
    /// once more.
    pub async fn refresh(&self) -> bool {
        match self.fetch_current().await {
            Completion::Clamped => self.fetch_current().await.applied(),
            outcome => outcome.applied(),
        }
    }

    async fn fetch_current(&self) -> Completion {
        let ticket = self.state.lock().await.begin_fetch();
        tracing::debug!(
            "Fetching {} page {} (ticket {})",
            self.label,
            ticket.query().page,
            ticket.seq()
        );

        let result = (self.fetch)(ticket.query().clone()).await.map_err(|e| {
            tracing::error!("Failed to load {}: {}", self.label, e);
            format!("Failed to load {}: {}", self.label, e)
        });

        self.state.lock().await.complete(&ticket, result)
    }

    /// Applies a new search term and reloads from the first page if it changed.
    pub async fn set_search(&self, term: impl Into<String>) -> bool {
        let changed = self.state.lock().await.set_search(term);
        if changed {
            self.refresh().await;
        }
        changed
    }

    pub async fn next_page(&self) -> bool {
        let moved = self.state.lock().await.next_page();
        if moved {
            self.refresh().await;
        }
        moved
    }

    pub async fn previous_page(&self) -> bool {
        let moved = self.state.lock().await.previous_page();
        if moved {
            self.refresh().await;
        }
        moved
    }

    pub async fn go_to(&self, page: u32) -> bool {
        let moved = self.state.lock().await.go_to(page);
        if moved {
            self.refresh().await;
        }
        moved
    }

    /// Awaits a single write, then re-fetches the current page once.
    ///
    /// Nothing is re-fetched when the write fails.
    pub async fn mutate<Fut>(&self, write: Fut) -> ApiResult<()>
    where
        Fut: Future<Output = ApiResult<()>>,
    {
        write.await?;
        self.refresh().await;
        Ok(())
    }

    /// Reads the list under its lock.
    pub async fn with_state<R>(&self, f: impl FnOnce(&ResourceList<T>) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }
}

impl ListDriver<Topic> {
    pub fn topics<A: TopicApi + 'static>(api: Arc<A>, page_size: u32) -> Self {
        ListDriver::new("topics", page_size, move |query| {
            let api = api.clone();
            async move { api.list_topics(&query).await }
        })
    }
}

impl ListDriver<Post> {
    pub fn topic_posts<A: TopicApi + 'static>(api: Arc<A>, topic_id: i64, page_size: u32) -> Self {
        ListDriver::new("posts", page_size, move |query| {
            let api = api.clone();
            async move { api.topic_posts(topic_id, &query).await }
        })
    }
}

impl<T: Listing> ListDriver<T> {
    pub fn dashboard<A: DashboardApi + 'static>(api: Arc<A>, scope: DashboardScope, page_size: u32) -> Self {
        ListDriver::new(T::SECTION.as_str(), page_size, move |query| {
            let api = api.clone();
            async move { api.dashboard_list::<T>(scope, &query).await }
        })
    }
}
