//! Yahoo Finance data providers.

pub mod client;
pub mod fundamentals;
mod wire;

pub use client::{FetchConfig, YahooClient};
pub use fundamentals::{YahooFundamentalsProvider, parse_quote_summary, parse_timeseries};
