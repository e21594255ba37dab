//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `kanban_core::api` instead of reaching into internal modules.

pub use crate::board::{Board, ColumnView, FormMode, FormSubmission, TaskForm, TaskOps};
pub use crate::cache::{CacheEvent, CacheKey, ColumnCache, ColumnSnapshot, LoadMore, Subscription};
pub use crate::config::{
    load_default, ApiConfig, AppConfig, BoardConfig, DiagnosticsConfig, LoggingConfig,
    PaginationStyle, TuiConfig,
};
pub use crate::diagnostics::{
    start_diagnostics, DiagnosticEvent, DiagnosticSink, DiagnosticsTx, JsonlFileSink,
};
pub use crate::dnd::{DragCoordinator, DragSession, DropOutcome, DropZone, Point, Rect};
pub use crate::domain::{Accent, Column, ColumnSpec, NewTask, Task, TaskId, COLUMNS};
pub use crate::error::{CliError, TaskServiceError};
pub use crate::search::SearchDebouncer;
pub use crate::service::{
    InMemoryTaskService, ListQuery, Op, TaskClient, TaskPage, TaskService,
};
