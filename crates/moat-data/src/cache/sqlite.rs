//! SQLite caching layer for provider responses.
//!
//! Response bodies are stored verbatim under a logical request key, so a
//! repeated analysis of the same ticker is served without touching the network.

use crate::error::{DataError, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite cache for raw provider responses.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                symbol TEXT NOT NULL,
                body TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_responses_symbol ON responses(symbol)",
            [],
        )?;

        Ok(())
    }

    /// Get a cached response body.
    ///
    /// Returns `None` if nothing is stored under `key`, or if `max_age` is given
    /// and the entry is older than that.
    pub fn get_response(&self, key: &str, max_age: Option<Duration>) -> Result<Option<String>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT body, cached_at FROM responses WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((body, cached_at)) = row else {
            return Ok(None);
        };

        if let Some(max_age) = max_age {
            let cached_at = DateTime::parse_from_rfc3339(&cached_at)
                .map_err(|e| DataError::Cache(format!("Invalid cached_at for {key}: {e}")))?
                .with_timezone(&Utc);
            if Utc::now() - cached_at > max_age {
                return Ok(None);
            }
        }

        Ok(Some(body))
    }

    /// Store a response body, replacing any previous entry for `key`.
    pub fn put_response(&self, key: &str, symbol: &str, body: &str) -> Result<()> {
        self.put_response_at(key, symbol, body, Utc::now())
    }

    fn put_response_at(
        &self,
        key: &str,
        symbol: &str,
        body: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (key, symbol, body, cached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, symbol, body, cached_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM responses", [])?;
        Ok(())
    }

    /// Clear cached data for a specific symbol. Returns the number of entries removed.
    pub fn clear_symbol(&self, symbol: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM responses WHERE symbol = ?1", params![symbol])?;
        Ok(removed)
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let (responses, symbols, oldest, newest): (i64, i64, Option<String>, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), COUNT(DISTINCT symbol), MIN(cached_at), MAX(cached_at)
                 FROM responses",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        Ok(CacheStats {
            responses: responses as usize,
            unique_symbols: symbols as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cached responses
    pub responses: usize,
    /// Number of unique symbols
    pub unique_symbols: usize,
    /// Timestamp of the oldest entry (RFC 3339)
    pub oldest_entry: Option<String>,
    /// Timestamp of the newest entry (RFC 3339)
    pub newest_entry: Option<String>,
}
