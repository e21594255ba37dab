//! Pointer-driven drag-and-drop of task cards between columns.
//!
//! The coordinator is a pure state machine: it decides *what* a gesture
//! means and leaves the remote update to [`TaskOps::move_task`].
//!
//! [`TaskOps::move_task`]: crate::board::TaskOps::move_task

mod coordinator;
mod geometry;
mod session;

pub use coordinator::DragCoordinator;
pub use geometry::{closest_corners, DropZone, Point, Rect};
pub use session::{DragSession, DropOutcome};
