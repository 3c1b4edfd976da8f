#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod error;

// Re-export main types from sub-crates
pub use moat_data as data;
pub use moat_metrics as metrics;

pub use analysis::{Analysis, analyze};
pub use error::{MoatError, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
