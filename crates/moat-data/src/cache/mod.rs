//! Caching layer for provider responses.

pub mod sqlite;

pub use sqlite::{CacheStats, SqliteCache};
