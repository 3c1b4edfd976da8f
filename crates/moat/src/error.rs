//! Error type for the analysis pipeline.

use moat_data::DataError;
use moat_metrics::MetricsError;
use thiserror::Error;

/// Either side of the pipeline can fail.
#[derive(Debug, Error)]
pub enum MoatError {
    /// Fetching statements or the snapshot failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// A required field was missing, or table conversion failed
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl MoatError {
    /// True when the provider simply has no usable figures for the ticker.
    pub const fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Metrics(MetricsError::DataUnavailable { .. })
                | Self::Data(DataError::MissingData { .. })
        )
    }
}

/// Result type alias for the analysis pipeline.
pub type Result<T> = std::result::Result<T, MoatError>;
