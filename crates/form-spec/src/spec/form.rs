use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldDefinition;
use crate::spec::rule::VisibilityRule;

/// Top-level form definition: ordered fields plus ordered show/hide rules.
///
/// Rule order is significant. Rules are applied as a sequential fold with
/// last-write-wins per target key; referential integrity of rule keys is the
/// schema author's responsibility, a dangling key just never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<VisibilityRule>,
}

impl FormSchema {
    /// Fields sorted by their display `order`, ties keeping declaration order.
    pub fn fields_by_order(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.order);
        fields
    }
}
