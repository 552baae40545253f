use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::TimeBucket;

/// Where a predicate reads its left-hand value from: the document's owning
/// form id, or a key inside the submitted data map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldRef {
    FormId,
    Data(String),
}

/// Conjunctive filter tree compiled from a chart spec.
///
/// `TimeAtLeast`/`TimeAtMost` carry parsed bounds; backends parse the
/// document's stored string per row before comparing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    All(Vec<Predicate>),
    Eq { field: FieldRef, value: Value },
    In { field: FieldRef, values: Vec<Value> },
    AtLeast { field: FieldRef, bound: Value },
    AtMost { field: FieldRef, bound: Value },
    TimeAtLeast { field: FieldRef, bound: DateTime<Utc> },
    TimeAtMost { field: FieldRef, bound: DateTime<Utc> },
}

/// Time half of a composite group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeKeySpec {
    pub field_key: String,
    pub bucket: TimeBucket,
}

/// Composite group key: dimension value (absent/null grouped under the
/// literal `"N/A"`), plus an optional bucketed time label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKeySpec {
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeKeySpec>,
}

/// How each group folds its rows into one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accumulator {
    /// Row count; the measure field is ignored.
    Count,
    /// Numeric sum; missing or non-numeric measures count as 0.
    Sum(String),
    /// Numeric mean over the group's rows, same coercion as `Sum`.
    Avg(String),
    /// Smallest raw measure value, no coercion; null/missing skipped.
    Min(String),
    /// Largest raw measure value, no coercion; null/missing skipped.
    Max(String),
}

/// Engine-agnostic compiled pipeline: filter, group, accumulate.
///
/// Built fresh per request, never persisted. Any backend supporting a
/// conjunctive predicate, a composite group key, and the five accumulators
/// can render it; sorting is part of the contract — ascending by time label
/// (rows without one first), then by dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDescriptor {
    pub predicate: Predicate,
    pub group_key: GroupKeySpec,
    pub accumulator: Accumulator,
}
