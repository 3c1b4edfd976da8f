#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod rate_limit;
pub mod source;
pub mod statement;
pub mod yahoo;

pub use cache::{CacheStats, SqliteCache};
pub use error::{DataError, Result};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use source::FundamentalsSource;
pub use statement::{Frequency, InfoSnapshot, StatementKind, StatementTable};
pub use yahoo::{FetchConfig, YahooClient, YahooFundamentalsProvider};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
