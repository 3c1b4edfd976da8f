#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod deriver;
pub mod error;
pub mod fields;
pub mod historical;
pub mod numeric;
pub mod summary;

pub use deriver::derive_metrics;
pub use error::{MetricsError, Result};
pub use fields::{FieldSource, RequiredField, RequiredInputs};
pub use historical::{HistoricalRow, HistoricalTable, Metric};
pub use summary::SummaryRow;
