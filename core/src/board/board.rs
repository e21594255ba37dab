use tokio::sync::watch;
use tokio::time::Duration;

use super::{ColumnView, TaskOps};
use crate::cache::Subscription;
use crate::config::BoardConfig;
use crate::dnd::{DragCoordinator, DragSession, DropOutcome, DropZone, Point, Rect};
use crate::domain::{Column, Task};
use crate::search::SearchDebouncer;

/// Wires the column subscriptions, the drag context and the search bar.
///
/// Holds no business rules: mutations go through [`TaskOps`], gestures
/// through [`DragCoordinator`].
pub struct Board {
    ops: TaskOps,
    drag: DragCoordinator,
    debouncer: SearchDebouncer,
    search_rx: watch::Receiver<String>,
    search_input: String,
    search: String,
    columns: Vec<Subscription>,
}

impl Board {
    /// Subscribes all four columns. Must be called inside a tokio runtime.
    pub fn new(ops: TaskOps, cfg: &BoardConfig) -> Self {
        let (debouncer, search_rx) =
            SearchDebouncer::new(Duration::from_millis(cfg.search_debounce_ms));
        let columns = subscribe_all(&ops, "");
        Self {
            ops,
            drag: DragCoordinator::new(cfg.drag_threshold),
            debouncer,
            search_rx,
            search_input: String::new(),
            search: String::new(),
            columns,
        }
    }

    pub fn ops(&self) -> &TaskOps {
        &self.ops
    }

    /// Raw text of the search box.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Term the columns are currently filtered by.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search_input(&mut self, raw: impl Into<String>) {
        self.search_input = raw.into();
        self.debouncer.push(self.search_input.clone());
    }

    /// Pick up a newly propagated search term and resubscribe the columns.
    /// Returns true when the term changed.
    pub fn sync_search(&mut self) -> bool {
        let term = self.search_rx.borrow_and_update().clone();
        if term == self.search {
            return false;
        }
        tracing::debug!(target: "kanban.board", term = %term, "search applied");
        // New subscriptions first so shared entries are not released in between.
        let columns = subscribe_all(&self.ops, &term);
        self.columns = columns;
        self.search = term;
        true
    }

    /// Wait for the next propagated search term.
    pub async fn search_changed(&mut self) -> bool {
        self.search_rx.changed().await.is_ok()
    }

    pub fn subscription(&self, column: Column) -> Option<&Subscription> {
        self.columns.get(column.index())
    }

    pub fn column(&self, column: Column) -> ColumnView {
        let snapshot = self
            .subscription(column)
            .map(Subscription::read)
            .unwrap_or_default();
        ColumnView::new(column, &self.search, snapshot)
    }

    /// Views for every column in display order. Reading may start background
    /// refreshes for stale columns.
    pub fn columns(&self) -> Vec<ColumnView> {
        Column::ALL.iter().map(|c| self.column(*c)).collect()
    }

    pub fn refresh(&self) {
        self.ops.cache().invalidate_all();
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Active drag, for rendering the ghost and the hovered column.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn pointer_down(&mut self, task: &Task, card: Rect, at: Point) -> bool {
        self.drag.pointer_down(task, card, at)
    }

    pub fn pointer_move(&mut self, at: Point, zones: &[DropZone]) -> Option<&DragSession> {
        self.drag.pointer_move(at, zones)
    }

    /// Release; a `Move` outcome still has to be applied with
    /// [`TaskOps::apply_drop`].
    pub fn pointer_up(&mut self, at: Point, zones: &[DropZone]) -> Option<DropOutcome> {
        self.drag.pointer_up(at, zones)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }
}

fn subscribe_all(ops: &TaskOps, search: &str) -> Vec<Subscription> {
    Column::ALL
        .iter()
        .map(|c| ops.cache().subscribe(*c, search))
        .collect()
}
