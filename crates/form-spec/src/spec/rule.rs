use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition operators for show/hide rules.
///
/// Operators introduced by newer form designers deserialize as `Unknown`
/// and always evaluate to a false condition (fail-closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RuleOperator {
    Equals,
    NotEquals,
    In,
    #[serde(other)]
    Unknown,
}

/// Declarative show/hide relationship: when the source field's value
/// satisfies the condition, the target field is shown, otherwise hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    pub target_field_key: String,
    pub source_field_key: String,
    pub operator: RuleOperator,
    /// Scalar for equals/notEquals; list (or scalar, normalized) for in.
    #[serde(default)]
    pub value: Value,
}
