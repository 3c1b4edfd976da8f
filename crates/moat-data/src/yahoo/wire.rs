//! Response shapes of the Yahoo endpoints used by the fundamentals provider.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesEnvelope {
    pub(crate) timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesBody {
    #[serde(default)]
    pub(crate) result: Option<Vec<TimeseriesResult>>,
    #[serde(default)]
    pub(crate) error: Option<ApiError>,
}

/// One requested type. The values live under a key equal to the type name,
/// e.g. `"annualTotalRevenue": [...]`, so they are captured by the flattened map.
#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesResult {
    pub(crate) meta: TimeseriesMeta,
    #[serde(flatten)]
    pub(crate) series: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    pub(crate) types: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataPoint {
    pub(crate) as_of_date: String,
    #[serde(default)]
    pub(crate) reported_value: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawValue {
    #[serde(default)]
    pub(crate) raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteSummaryEnvelope {
    pub(crate) quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteSummaryBody {
    #[serde(default)]
    pub(crate) result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    pub(crate) error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteSummaryResult {
    #[serde(default)]
    pub(crate) default_key_statistics: Option<KeyStatistics>,
    #[serde(default)]
    pub(crate) summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeyStatistics {
    #[serde(default)]
    pub(crate) trailing_eps: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    pub(crate) trailing_pe: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code.as_deref().unwrap_or("unknown"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}
