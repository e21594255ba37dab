//! Board logic for the kanban task client.
//!
//! Rendering lives in `kanban-cli`, the REST transport in `kanban-plugins`.
//! Everything in between (task model, column cache, drag-and-drop, search
//! debouncing, board wiring) lives here.

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod dnd;
pub mod domain;
pub mod error;
pub mod search;
pub mod service;
pub mod util;
