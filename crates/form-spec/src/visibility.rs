use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::spec::form::FormSchema;
use crate::spec::rule::RuleOperator;

/// Set of field keys currently shown to the submitter.
pub type VisibleSet = BTreeSet<String>;

/// Computes which fields are visible for the given payload.
///
/// Every declared field starts visible. Rules are applied in declaration
/// order; each rule whose condition holds inserts its target, each rule
/// whose condition fails removes it, so a later rule overrides an earlier
/// one for the same target.
pub fn visible_fields(schema: &FormSchema, data: &Map<String, Value>) -> VisibleSet {
    let mut visible: VisibleSet = schema
        .fields
        .iter()
        .map(|field| field.key.clone())
        .collect();

    for rule in &schema.rules {
        let source_value = data.get(&rule.source_field_key).unwrap_or(&Value::Null);
        let matched = match rule.operator {
            RuleOperator::Equals => *source_value == rule.value,
            RuleOperator::NotEquals => *source_value != rule.value,
            RuleOperator::In => contains(&rule.value, source_value),
            RuleOperator::Unknown => false,
        };
        if matched {
            visible.insert(rule.target_field_key.clone());
        } else {
            visible.remove(&rule.target_field_key);
        }
    }

    visible
}

/// Membership test with the rule value normalized to a list: a scalar rule
/// value behaves like a one-element list.
fn contains(rule_value: &Value, candidate: &Value) -> bool {
    match rule_value {
        Value::Array(items) => items.iter().any(|item| item == candidate),
        scalar => scalar == candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::rule::VisibilityRule;
    use serde_json::json;

    fn rule(target: &str, source: &str, operator: RuleOperator, value: Value) -> VisibilityRule {
        VisibilityRule {
            target_field_key: target.into(),
            source_field_key: source.into(),
            operator,
            value,
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn two_field_schema(rules: Vec<VisibilityRule>) -> FormSchema {
        let fields = serde_json::from_value(json!([
            {"key": "a", "label": "A", "type": "text"},
            {"key": "b", "label": "B", "type": "text"},
        ]))
        .unwrap();
        FormSchema {
            id: "f1".into(),
            title: "Test".into(),
            description: None,
            fields,
            rules,
        }
    }

    #[test]
    fn all_fields_visible_without_rules() {
        let schema = two_field_schema(vec![]);
        let visible = visible_fields(&schema, &payload(json!({})));
        assert_eq!(visible, VisibleSet::from(["a".into(), "b".into()]));
    }

    #[test]
    fn equals_rule_toggles_target() {
        let schema = two_field_schema(vec![rule("b", "a", RuleOperator::Equals, json!("x"))]);
        assert!(visible_fields(&schema, &payload(json!({"a": "x"}))).contains("b"));
        assert!(!visible_fields(&schema, &payload(json!({"a": "y"}))).contains("b"));
        assert!(!visible_fields(&schema, &payload(json!({}))).contains("b"));
    }

    #[test]
    fn equals_does_not_coerce_types() {
        let schema = two_field_schema(vec![rule("b", "a", RuleOperator::Equals, json!("1"))]);
        assert!(!visible_fields(&schema, &payload(json!({"a": 1}))).contains("b"));
    }

    #[test]
    fn in_rule_accepts_scalar_rule_value() {
        let schema = two_field_schema(vec![rule("b", "a", RuleOperator::In, json!("x"))]);
        assert!(visible_fields(&schema, &payload(json!({"a": "x"}))).contains("b"));
    }

    #[test]
    fn in_rule_checks_membership() {
        let schema = two_field_schema(vec![rule("b", "a", RuleOperator::In, json!(["x", "y"]))]);
        assert!(visible_fields(&schema, &payload(json!({"a": "y"}))).contains("b"));
        assert!(!visible_fields(&schema, &payload(json!({"a": "z"}))).contains("b"));
    }

    #[test]
    fn unknown_operator_hides_target() {
        let rule: VisibilityRule = serde_json::from_value(json!({
            "targetFieldKey": "b",
            "sourceFieldKey": "a",
            "operator": "matchesGlob",
            "value": "x",
        }))
        .unwrap();
        assert_eq!(rule.operator, RuleOperator::Unknown);
        let schema = two_field_schema(vec![rule]);
        assert!(!visible_fields(&schema, &payload(json!({"a": "x"}))).contains("b"));
    }

    #[test]
    fn later_rule_wins_for_same_target() {
        let schema = two_field_schema(vec![
            rule("b", "a", RuleOperator::Equals, json!("never")),
            rule("b", "a", RuleOperator::NotEquals, json!("never")),
        ]);
        assert!(visible_fields(&schema, &payload(json!({"a": "x"}))).contains("b"));
    }
}
