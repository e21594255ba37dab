//! Per-column task cache with paging, invalidation and stale-while-revalidate.
//!
//! One [`ColumnCache`] is built per session and handed to every view. Views
//! hold a [`Subscription`] per `(column, search)` key and read snapshots
//! from it; writers call [`ColumnCache::invalidate`] after a mutation.

mod entry;
mod key;
mod store;

pub use entry::{ColumnSnapshot, LoadMore};
pub use key::{CacheEvent, CacheKey};
pub use store::{ColumnCache, Subscription};
