use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::TaskService;
use crate::domain::{Column, NewTask, Task, TaskId};
use crate::error::TaskServiceError;
use crate::util::lock;

/// Operation kinds, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct MemState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
    failures: HashMap<Op, TaskServiceError>,
}

/// In-process task store with json-server-like semantics.
///
/// Ids are assigned incrementally from 1, pages are ordered by id, unknown
/// ids yield `NotFound`. Every call is counted per [`Op`] so tests can assert
/// how many requests a flow issued. An optional latency is applied with
/// `tokio::time::sleep`, which cooperates with paused test clocks.
#[derive(Default)]
pub struct InMemoryTaskService {
    state: Mutex<MemState>,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert directly, bypassing call counting. Returns the stored task.
    pub fn seed(&self, draft: NewTask) -> Task {
        let mut state = lock(&self.state);
        insert(&mut state, draft)
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: Op, err: TaskServiceError) {
        lock(&self.state).failures.insert(op, err);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.counter(op).load(Ordering::SeqCst)
    }

    /// Current tasks of `column`, ordered by id.
    pub fn tasks_in(&self, column: Column) -> Vec<Task> {
        lock(&self.state)
            .tasks
            .values()
            .filter(|t| t.column == column)
            .cloned()
            .collect()
    }

    fn counter(&self, op: Op) -> &AtomicUsize {
        match op {
            Op::List => &self.list_calls,
            Op::Create => &self.create_calls,
            Op::Update => &self.update_calls,
            Op::Delete => &self.delete_calls,
        }
    }

    async fn enter(&self, op: Op) -> Result<(), TaskServiceError> {
        self.counter(op).fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.state).failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn insert(state: &mut MemState, draft: NewTask) -> Task {
    state.next_id += 1;
    let task = draft.with_id(state.next_id);
    state.tasks.insert(task.id, task.clone());
    task
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_page(
        &self,
        column: Column,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Task>, TaskServiceError> {
        self.enter(Op::List).await?;
        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let state = lock(&self.state);
        Ok(state
            .tasks
            .values()
            .filter(|t| t.column == column)
            .skip(skip)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn create_task(&self, draft: NewTask) -> Result<Task, TaskServiceError> {
        self.enter(Op::Create).await?;
        draft.validate()?;
        let mut state = lock(&self.state);
        Ok(insert(&mut state, draft))
    }

    async fn update_task(&self, task: Task) -> Result<Task, TaskServiceError> {
        self.enter(Op::Update).await?;
        let mut state = lock(&self.state);
        match state.tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(task)
            }
            None => Err(TaskServiceError::NotFound(task.id)),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.enter(Op::Delete).await?;
        let mut state = lock(&self.state);
        match state.tasks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(TaskServiceError::NotFound(id)),
        }
    }
}
