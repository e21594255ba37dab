use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::sync::{broadcast, oneshot};
use tokio::time::{Duration, Instant};

use super::entry::{Entry, FetchKind, InFlight};
use super::{CacheEvent, CacheKey, ColumnSnapshot, LoadMore};
use crate::config::BoardConfig;
use crate::domain::{Column, Task};
use crate::error::TaskServiceError;
use crate::service::{ListQuery, TaskClient};
use crate::util::lock;

const EVENT_CAPACITY: usize = 64;

/// Shared cache of column pages. Clones share state.
#[derive(Clone)]
pub struct ColumnCache {
    inner: Arc<Inner>,
}

struct Inner {
    client: TaskClient,
    page_size: u32,
    stale_time: Duration,
    gc_time: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
    events: broadcast::Sender<CacheEvent>,
}

impl ColumnCache {
    pub fn new(client: TaskClient, cfg: &BoardConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                page_size: cfg.page_size.max(1),
                stale_time: Duration::from_millis(cfg.stale_time_ms),
                gc_time: Duration::from_millis(cfg.gc_time_ms),
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    pub fn client(&self) -> &TaskClient {
        &self.inner.client
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    pub fn events(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Register interest in `(column, search)` and start the first load if
    /// the entry has no fresh data. Must be called inside a tokio runtime.
    pub fn subscribe(&self, column: Column, search: &str) -> Subscription {
        let key = CacheKey::new(column, search);
        let now = Instant::now();
        {
            let mut entries = lock(&self.inner.entries);
            let gc_time = self.inner.gc_time;
            entries.retain(|k, e| {
                let expired = e.subscribers == 0
                    && e
                        .unsubscribed_at
                        .is_some_and(|at| now.saturating_duration_since(at) >= gc_time);
                if expired {
                    tracing::debug!(target: "kanban.cache", key = %k, "entry collected");
                }
                !expired
            });
            let entry = entries.entry(key.clone()).or_default();
            entry.subscribers += 1;
            entry.unsubscribed_at = None;
            if entry.needs_refresh(now, self.inner.stale_time) {
                self.start_refresh(&key, entry);
            }
        }
        tracing::debug!(target: "kanban.cache", stage = "cache.subscribe", key = %key);
        Subscription {
            cache: self.clone(),
            key,
        }
    }

    /// Mark every entry of `column` stale and drop its in-flight fetches.
    /// Subscribed entries refetch on their next read.
    pub fn invalidate(&self, column: Column) {
        let mut touched = 0usize;
        {
            let mut entries = lock(&self.inner.entries);
            for (key, entry) in entries.iter_mut() {
                if key.column == column {
                    entry.cancel_inflight();
                    entry.invalidated = true;
                    touched += 1;
                }
            }
        }
        tracing::debug!(
            target: "kanban.cache",
            stage = "cache.invalidate",
            column = %column,
            entries = touched
        );
        let _ = self.inner.events.send(CacheEvent::Invalidated(column));
    }

    pub fn invalidate_all(&self) {
        for column in Column::ALL {
            self.invalidate(column);
        }
    }

    /// Number of live entries, subscribed or waiting for collection.
    pub fn entry_count(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    fn read(&self, key: &CacheKey) -> ColumnSnapshot {
        let now = Instant::now();
        let mut entries = lock(&self.inner.entries);
        match entries.get_mut(key) {
            Some(entry) => {
                if entry.needs_refresh(now, self.inner.stale_time) {
                    self.start_refresh(key, entry);
                }
                entry.snapshot(now, self.inner.stale_time)
            }
            None => ColumnSnapshot::default(),
        }
    }

    fn snapshot(&self, key: &CacheKey) -> ColumnSnapshot {
        let now = Instant::now();
        lock(&self.inner.entries)
            .get(key)
            .map(|e| e.snapshot(now, self.inner.stale_time))
            .unwrap_or_default()
    }

    /// Append the next page of `key`. The key must be subscribed.
    pub async fn load_more(&self, key: &CacheKey) -> LoadMore {
        let rx = {
            let mut entries = lock(&self.inner.entries);
            let Some(entry) = entries.get_mut(key) else {
                return LoadMore::Superseded;
            };
            if entry.inflight.is_some() {
                return LoadMore::Busy;
            }
            if entry.invalidated || !entry.has_data {
                self.start_refresh(key, entry);
                return LoadMore::Busy;
            }
            if !entry.has_more {
                return LoadMore::Exhausted;
            }
            self.start_more(key, entry)
        };
        rx.await.unwrap_or(LoadMore::Superseded)
    }

    async fn settle(&self, key: &CacheKey) {
        loop {
            let done = {
                let entries = lock(&self.inner.entries);
                entries
                    .get(key)
                    .and_then(|e| e.inflight.as_ref().map(|f| f.done.clone()))
            };
            match done {
                Some(done) => done.await,
                None => break,
            }
        }
    }

    fn unsubscribe(&self, key: &CacheKey) {
        let mut entries = lock(&self.inner.entries);
        if let Some(entry) = entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                if entry.inflight.is_some() {
                    entry.cancel_inflight();
                    entry.invalidated = true;
                    tracing::debug!(target: "kanban.cache", key = %key, "in-flight fetch cancelled");
                }
                entry.unsubscribed_at = Some(Instant::now());
            }
        }
    }

    /// Refetch pages `1..=max(1, loaded)` and swap them in on completion.
    fn start_refresh(&self, key: &CacheKey, entry: &mut Entry) {
        let pages = entry.loaded_pages().max(1);
        let generation = entry.generation;
        let ticket = entry.take_ticket();
        let inner = self.inner.clone();
        let task_key = key.clone();

        tracing::debug!(
            target: "kanban.cache",
            stage = "cache.refresh.in",
            key = %key,
            pages = pages,
            generation = generation
        );

        let body = async move {
            let result = fetch_pages(&inner.client, &task_key, pages, inner.page_size).await;
            let now = Instant::now();
            {
                let mut entries = lock(&inner.entries);
                let Some(entry) = entries.get_mut(&task_key) else {
                    return;
                };
                if entry.generation != generation {
                    tracing::debug!(
                        target: "kanban.cache",
                        key = %task_key,
                        generation = generation,
                        "stale refresh discarded"
                    );
                    return;
                }
                entry.finish(ticket);
                entry.checked_at = Some(now);
                entry.invalidated = false;
                match result {
                    Ok((pages, has_more)) => {
                        entry.pages = pages;
                        entry.has_more = has_more;
                        entry.has_data = true;
                        entry.error = None;
                        entry.updated_at = Some(now);
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "kanban.cache",
                            key = %task_key,
                            error = %err,
                            "refresh failed"
                        );
                        entry.error = Some(err);
                    }
                }
                tracing::debug!(
                    target: "kanban.cache",
                    stage = "cache.refresh.out",
                    key = %task_key,
                    tasks = entry.pages.iter().map(Vec::len).sum::<usize>(),
                    has_more = entry.has_more
                );
            }
            let _ = inner.events.send(CacheEvent::Updated(task_key));
        };

        self.spawn_fetch(entry, ticket, FetchKind::Refresh, body);
    }

    fn start_more(&self, key: &CacheKey, entry: &mut Entry) -> oneshot::Receiver<LoadMore> {
        let page = entry.loaded_pages().saturating_add(1);
        let generation = entry.generation;
        let ticket = entry.take_ticket();
        let inner = self.inner.clone();
        let task_key = key.clone();
        let (result_tx, result_rx) = oneshot::channel();

        tracing::debug!(
            target: "kanban.cache",
            stage = "cache.more.in",
            key = %key,
            page = page
        );

        let body = async move {
            let query =
                ListQuery::new(task_key.column, page, inner.page_size).with_search(&*task_key.search);
            let result = inner.client.list_tasks(&query).await;
            let outcome = {
                let mut entries = lock(&inner.entries);
                match entries.get_mut(&task_key) {
                    Some(entry) if entry.generation == generation => {
                        entry.finish(ticket);
                        match result {
                            Ok(fetched) => {
                                let appended = fetched.tasks.len();
                                entry.pages.push(fetched.tasks);
                                entry.has_more = fetched.has_more;
                                entry.error = None;
                                LoadMore::Loaded {
                                    appended,
                                    has_more: fetched.has_more,
                                }
                            }
                            Err(err) => {
                                entry.error = Some(err.clone());
                                LoadMore::Failed(err)
                            }
                        }
                    }
                    _ => LoadMore::Superseded,
                }
            };
            tracing::debug!(
                target: "kanban.cache",
                stage = "cache.more.out",
                key = %task_key,
                page = page,
                outcome = ?outcome
            );
            if outcome != LoadMore::Superseded {
                let _ = inner.events.send(CacheEvent::Updated(task_key));
            }
            let _ = result_tx.send(outcome);
        };

        self.spawn_fetch(entry, ticket, FetchKind::More, body);
        result_rx
    }

    fn spawn_fetch<F>(&self, entry: &mut Entry, ticket: u64, kind: FetchKind, body: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            body.await;
            let _ = done_tx.send(());
        });
        entry.inflight = Some(InFlight {
            ticket,
            kind,
            abort: handle.abort_handle(),
            done: done_rx.map(|_| ()).boxed().shared(),
        });
    }
}

async fn fetch_pages(
    client: &TaskClient,
    key: &CacheKey,
    pages: u32,
    page_size: u32,
) -> Result<(Vec<Vec<Task>>, bool), TaskServiceError> {
    let mut out = Vec::new();
    let mut has_more = false;
    for page in 1..=pages {
        let query = ListQuery::new(key.column, page, page_size).with_search(&*key.search);
        let fetched = client.list_tasks(&query).await?;
        has_more = fetched.has_more;
        out.push(fetched.tasks);
        if !has_more {
            break;
        }
    }
    Ok((out, has_more))
}

/// A view's handle on one cache key. Dropping it releases the key.
pub struct Subscription {
    cache: ColumnCache,
    key: CacheKey,
}

impl Subscription {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Current snapshot; starts a background refresh when the entry is stale
    /// or invalidated. Old data stays visible until the refresh lands.
    pub fn read(&self) -> ColumnSnapshot {
        self.cache.read(&self.key)
    }

    /// Current snapshot without side effects.
    pub fn snapshot(&self) -> ColumnSnapshot {
        self.cache.snapshot(&self.key)
    }

    pub async fn load_more(&self) -> LoadMore {
        self.cache.load_more(&self.key).await
    }

    /// Invalidate this subscription's column.
    pub fn invalidate(&self) {
        self.cache.invalidate(self.key.column);
    }

    /// Wait until no fetch is in flight for this key.
    pub async fn settle(&self) {
        self.cache.settle(&self.key).await;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
