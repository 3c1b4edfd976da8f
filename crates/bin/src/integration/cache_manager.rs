//! Cache manager for Yahoo responses.
//!
//! Opens the SQLite response cache at a platform-specific default location.

use moat::data::{DataError, SqliteCache};
use std::path::PathBuf;
use tracing::debug;

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/moat/`
/// - macOS: `~/Library/Caches/moat/`
/// - Windows: `%LOCALAPPDATA%\moat\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moat")
}

/// Get the cache database path.
pub(crate) fn get_cache_path() -> PathBuf {
    default_cache_dir().join("moat.db")
}

/// Open the cache, creating the directory if needed.
pub(crate) fn open_cache() -> Result<SqliteCache, DataError> {
    let cache_path = get_cache_path();

    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    debug!(path = %cache_path.display(), "opening response cache");
    SqliteCache::new(&cache_path)
}

/// Print cache location and size.
pub(crate) fn print_cache_info() {
    println!("  Cache location: {}", get_cache_path().display());
    if let Some(stats) = open_cache().ok().and_then(|cache| cache.get_stats().ok()) {
        println!(
            "  Cached data: {} responses for {} symbols",
            stats.responses, stats.unique_symbols
        );
    }
}
