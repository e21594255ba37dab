use std::fmt;

use crate::domain::Column;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub column: Column,
    /// Propagated search term; empty means unfiltered.
    pub search: String,
}

impl CacheKey {
    pub fn new(column: Column, search: impl Into<String>) -> Self {
        Self {
            column,
            search: search.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            write!(f, "{}", self.column)
        } else {
            write!(f, "{}?q={}", self.column, self.search)
        }
    }
}

/// Change notifications for views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// New data, a new error, or a fetch state change for one key.
    Updated(CacheKey),
    /// Every key of this column was marked stale.
    Invalidated(Column),
}
