use futures::future::{BoxFuture, Shared};
use tokio::task::AbortHandle;
use tokio::time::{Duration, Instant};

use crate::domain::Task;
use crate::error::TaskServiceError;

/// Result of [`Subscription::load_more`](super::Subscription::load_more).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    Loaded { appended: usize, has_more: bool },
    /// A fetch for the key was already in flight; nothing was issued.
    Busy,
    /// The last page was short; there is nothing more to load.
    Exhausted,
    /// The key was invalidated while the page was in flight; result dropped.
    Superseded,
    Failed(TaskServiceError),
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSnapshot {
    pub tasks: Vec<Task>,
    /// First load of an entry that has no data yet.
    pub is_loading: bool,
    pub is_fetching_more: bool,
    pub is_error: bool,
    pub error: Option<TaskServiceError>,
    pub has_more: bool,
    pub is_stale: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FetchKind {
    Refresh,
    More,
}

pub(super) struct InFlight {
    pub ticket: u64,
    pub kind: FetchKind,
    pub abort: AbortHandle,
    pub done: Shared<BoxFuture<'static, ()>>,
}

#[derive(Default)]
pub(super) struct Entry {
    pub pages: Vec<Vec<Task>>,
    pub has_more: bool,
    pub has_data: bool,
    pub error: Option<TaskServiceError>,
    pub invalidated: bool,
    /// Last successful refresh.
    pub updated_at: Option<Instant>,
    /// Last completed refresh attempt, successful or not.
    pub checked_at: Option<Instant>,
    pub generation: u64,
    pub next_ticket: u64,
    pub inflight: Option<InFlight>,
    pub subscribers: usize,
    pub unsubscribed_at: Option<Instant>,
}

impl Entry {
    pub fn needs_refresh(&self, now: Instant, stale_time: Duration) -> bool {
        if self.inflight.is_some() {
            return false;
        }
        if self.invalidated {
            return true;
        }
        match self.checked_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= stale_time,
        }
    }

    pub fn is_stale(&self, now: Instant, stale_time: Duration) -> bool {
        if !self.has_data {
            return false;
        }
        self.invalidated
            || self
                .updated_at
                .map_or(true, |at| now.saturating_duration_since(at) >= stale_time)
    }

    pub fn loaded_pages(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    /// Drop the in-flight fetch, if any, and make its result unappliable.
    pub fn cancel_inflight(&mut self) {
        self.generation += 1;
        if let Some(inflight) = self.inflight.take() {
            inflight.abort.abort();
        }
    }

    pub fn take_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    pub fn finish(&mut self, ticket: u64) {
        if self.inflight.as_ref().is_some_and(|f| f.ticket == ticket) {
            self.inflight = None;
        }
    }

    pub fn snapshot(&self, now: Instant, stale_time: Duration) -> ColumnSnapshot {
        let kind = self.inflight.as_ref().map(|f| f.kind);
        ColumnSnapshot {
            tasks: self.pages.iter().flatten().cloned().collect(),
            is_loading: !self.has_data && kind == Some(FetchKind::Refresh),
            is_fetching_more: kind == Some(FetchKind::More),
            is_error: self.error.is_some(),
            error: self.error.clone(),
            has_more: self.has_more,
            is_stale: self.is_stale(now, stale_time),
        }
    }
}
