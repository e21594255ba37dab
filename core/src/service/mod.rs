//! Task Service port, the client wrapper views talk to, and an in-process
//! implementation of the port.

mod client;
mod filter;
mod memory;
mod r#trait;

pub use client::{ListQuery, TaskClient, TaskPage};
pub use filter::{filter_tasks, matches_search};
pub use memory::{InMemoryTaskService, Op};
pub use r#trait::TaskService;
