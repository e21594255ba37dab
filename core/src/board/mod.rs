//! Board composition: four column views, the shared drag context, the
//! search bar, and the task forms that feed them.

mod board;
mod form;
mod ops;
mod view;

pub use board::Board;
pub use form::{FormMode, FormSubmission, TaskForm};
pub use ops::TaskOps;
pub use view::ColumnView;
