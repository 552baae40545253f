use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Measure sentinel meaning "count matching rows, no measure field".
pub const COUNT_MEASURE: &str = "_count";

/// Filter operators accepted by chart specs.
///
/// Operators this build does not know deserialize as `Unknown` and compile
/// to nothing: a chart saved against a newer operator set still runs, it
/// just filters less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    In,
    Range,
    DateRange,
    #[serde(other)]
    Unknown,
}

/// One conjunctive filter clause over a submission data field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartFilter {
    pub field_key: String,
    pub operator: FilterOperator,
    /// Scalar for eq, list for in, `{min,max}` for range,
    /// `{from,to}` ISO-8601 strings for dateRange.
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// Calendar granularity for time-series grouping, on the UTC calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Day,
    Week,
    Month,
}

/// Declarative description of one grouped aggregation over the submissions
/// of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub form_id: String,
    /// Field key whose value labels each group.
    pub dimension: String,
    /// Field key to accumulate, or [`COUNT_MEASURE`].
    #[serde(default = "default_measure")]
    pub measure: String,
    pub aggregation: Aggregation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ChartFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_bucket: Option<TimeBucket>,
    /// Field carrying the timestamp to bucket; only meaningful together
    /// with `time_bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_field_key: Option<String>,
}

fn default_measure() -> String {
    COUNT_MEASURE.to_string()
}
