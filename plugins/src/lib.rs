//! Adapters for `kanban-core` ports: the REST task service and the
//! diagnostics sinks, plus factories that build them from config.

pub mod diagnostics;
pub mod factory;
pub mod tasks;
