//! Yahoo Finance HTTP client with response caching and rate limiting.

use crate::cache::SqliteCache;
use crate::error::{DataError, Result};
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use chrono::Duration as CacheAge;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Yahoo query API base URL
const QUERY_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Endpoint that hands out the session cookie the crumb is bound to
const COOKIE_URL: &str = "https://fc.yahoo.com";

/// Yahoo rejects requests without a browser-like user agent
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Configuration for cache usage.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whether to use the cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore cached entries, still store new ones).
    pub force_refresh: bool,
    /// Entries older than this are treated as missing (default: never expire).
    pub max_age: Option<CacheAge>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
            max_age: None,
        }
    }
}

/// HTTP client for Yahoo Finance.
///
/// Every request is looked up in the optional [`SqliteCache`] first. Only
/// cache misses pass through the [`RateLimiter`] and reach the network.
pub struct YahooClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    cache: Option<StdMutex<SqliteCache>>,
    fetch_config: FetchConfig,
    base_url: String,
    cookie_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    /// Create a client with the default rate limit (2 requests per 5 seconds) and no cache.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(RateLimitConfig::default())
    }

    /// Create a client with a custom rate limit.
    ///
    /// # Example
    /// ```no_run
    /// use moat_data::{RateLimitConfig, YahooClient};
    /// use std::time::Duration;
    ///
    /// # fn example() -> moat_data::Result<()> {
    /// // 1 request per second
    /// let client = YahooClient::with_rate_limit(RateLimitConfig {
    ///     max_requests: 1,
    ///     window: Duration::from_secs(1),
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rate_limit(config: RateLimitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config))),
            cache: None,
            fetch_config: FetchConfig::default(),
            base_url: QUERY_BASE_URL.to_string(),
            cookie_url: COOKIE_URL.to_string(),
            crumb: Mutex::new(None),
        })
    }

    /// Attach a response cache.
    pub fn with_cache(mut self, cache: SqliteCache) -> Self {
        self.cache = Some(StdMutex::new(cache));
        self
    }

    /// Set how the cache is used.
    pub fn with_fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch_config = config;
        self
    }

    /// Point the client at another host (e.g. a mock server).
    ///
    /// `base_url` replaces the query API host; `cookie_url` is the page fetched
    /// to obtain a session cookie before requesting a crumb.
    pub fn with_base_url(
        mut self,
        base_url: impl Into<String>,
        cookie_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self.cookie_url = cookie_url.into();
        self
    }

    /// Query API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` on the query API, going through the cache.
    ///
    /// # Arguments
    /// * `cache_key` - Logical key the response body is stored under
    /// * `symbol` - Ticker the response belongs to (used for per-symbol cache clearing)
    /// * `path` - Path below the base URL, starting with `/`
    /// * `query` - Query parameters
    /// * `with_crumb` - Whether the endpoint requires the session crumb
    pub async fn get_text(
        &self,
        cache_key: &str,
        symbol: &str,
        path: &str,
        query: &[(&str, String)],
        with_crumb: bool,
    ) -> Result<String> {
        if let Some(body) = self.cached(cache_key)? {
            debug!(cache_key, "cache hit");
            return Ok(body);
        }
        debug!(cache_key, "cache miss");

        let mut query = query.to_vec();
        if with_crumb {
            query.push(("crumb", self.crumb().await?));
        }

        let url = format!("{}{}", self.base_url, path);
        let body = self.send(&url, &query).await?;
        self.store(cache_key, symbol, &body)?;

        Ok(body)
    }

    fn cached(&self, cache_key: &str) -> Result<Option<String>> {
        if !self.fetch_config.use_cache || self.fetch_config.force_refresh {
            return Ok(None);
        }
        let Some(cache) = &self.cache else {
            return Ok(None);
        };
        let cache = cache
            .lock()
            .map_err(|_| DataError::Cache("cache lock poisoned".to_string()))?;
        cache.get_response(cache_key, self.fetch_config.max_age)
    }

    fn store(&self, cache_key: &str, symbol: &str, body: &str) -> Result<()> {
        if !self.fetch_config.use_cache {
            return Ok(());
        }
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        let cache = cache
            .lock()
            .map_err(|_| DataError::Cache("cache lock poisoned".to_string()))?;
        cache.put_response(cache_key, symbol, body)
    }

    async fn send(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.rate_limiter.lock().await.acquire().await;

        info!(url, "requesting");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(DataError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http(format!("GET {url}: HTTP {status}")));
        }

        response.text().await.map_err(DataError::Network)
    }

    /// Obtain (once per client) the crumb that authenticates quoteSummary requests.
    async fn crumb(&self) -> Result<String> {
        let mut crumb = self.crumb.lock().await;
        if let Some(crumb) = crumb.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie endpoint answers 404 but still sets the session cookie
        self.rate_limiter.lock().await.acquire().await;
        self.client
            .get(&self.cookie_url)
            .send()
            .await
            .map_err(DataError::Network)?;

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let text = self.send(&url, &[]).await?;
        let value = text.trim();
        if value.is_empty() || value.contains('<') {
            return Err(DataError::YahooApi("Failed to obtain crumb".to_string()));
        }

        debug!("obtained crumb");
        *crumb = Some(value.to_string());
        Ok(value.to_string())
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .field("fetch_config", &self.fetch_config)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
