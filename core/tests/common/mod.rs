#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kanban_core::api::{
    BoardConfig, Column, ColumnCache, NewTask, Subscription, Task, TaskClient, TaskOps,
};
use kanban_core::service::InMemoryTaskService;

pub struct Harness {
    pub svc: Arc<InMemoryTaskService>,
    pub client: TaskClient,
    pub cache: ColumnCache,
    pub ops: TaskOps,
}

pub fn harness(latency_ms: u64) -> Harness {
    let mut svc = InMemoryTaskService::new();
    if latency_ms > 0 {
        svc = svc.with_latency(Duration::from_millis(latency_ms));
    }
    let svc = Arc::new(svc);
    let client = TaskClient::new(svc.clone());
    let cache = ColumnCache::new(client.clone(), &BoardConfig::default());
    let ops = TaskOps::new(cache.clone());
    Harness {
        svc,
        client,
        cache,
        ops,
    }
}

pub fn seed(h: &Harness, titles: &[&str], column: Column) -> Vec<Task> {
    titles
        .iter()
        .map(|t| h.svc.seed(NewTask::new(*t, "", column)))
        .collect()
}

/// Fresh read: subscribe, wait for the load, return the tasks.
pub async fn fresh_list(h: &Harness, column: Column) -> Vec<Task> {
    let sub: Subscription = h.cache.subscribe(column, "");
    sub.read();
    sub.settle().await;
    sub.snapshot().tasks
}

pub fn count_id(tasks: &[Task], id: u64) -> usize {
    tasks.iter().filter(|t| t.id == id).count()
}
