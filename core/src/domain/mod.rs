mod column;
mod task;

pub use column::{Accent, Column, ColumnSpec, COLUMNS};
pub use task::{NewTask, Task, TaskId};
pub(crate) use task::validate_title;
