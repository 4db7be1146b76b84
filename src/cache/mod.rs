//! Cache module for persisting the default feed to disk
//!
//! The cache holds a single timestamped record. Freshness is decided by the
//! feed service, not here; a record that cannot be read or parsed is simply
//! reported as absent.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CacheRecord, CacheStore, CACHE_KEY};
