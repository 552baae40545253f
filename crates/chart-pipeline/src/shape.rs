use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::GroupRow;

/// One row of chart output; `label` is the time bucket when bucketing is
/// active, the dimension value otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationPoint {
    pub label: Value,
    pub dimension: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub value: Value,
}

/// Flattens grouped rows into chart points. A pure rename step: no
/// filtering, no re-aggregation, order preserved.
pub fn shape(rows: Vec<GroupRow>) -> Vec<AggregationPoint> {
    rows.into_iter()
        .map(|row| AggregationPoint {
            label: match &row.time {
                Some(time) => Value::String(time.clone()),
                None => row.dimension.clone(),
            },
            dimension: row.dimension,
            time: row.time,
            value: row.value,
        })
        .collect()
}
