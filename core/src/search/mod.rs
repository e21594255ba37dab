//! Debounced propagation of the board's search term.

mod debounce;

pub use debounce::SearchDebouncer;
