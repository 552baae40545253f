use serde_json::{Map, Value, json};

use crate::spec::field::{FieldDefinition, FieldType};
use crate::spec::form::FormSchema;
use crate::visibility::VisibleSet;

/// Builds a JSON Schema object covering the currently-visible fields.
///
/// Renderers use this to drive input widgets; it is advisory and looser
/// than [`crate::validate::validate`], which stays authoritative.
pub fn generate(schema: &FormSchema, visible: &VisibleSet) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        if !visible.contains(&field.key) {
            continue;
        }
        properties.insert(field.key.clone(), field_schema(field));
        if field.required {
            required.push(Value::String(field.key.clone()));
        }
    }

    json!({
        "type": "object",
        "title": schema.title,
        "properties": properties,
        "required": required,
        "additionalProperties": true,
    })
}

fn field_schema(field: &FieldDefinition) -> Value {
    let mut node = Map::new();
    node.insert("title".into(), json!(field.label));

    match field.field_type {
        FieldType::Text => {
            node.insert("type".into(), json!("string"));
            if let Some(validations) = &field.validations {
                if let Some(min_length) = validations.min_length {
                    node.insert("minLength".into(), json!(min_length));
                }
                if let Some(max_length) = validations.max_length {
                    node.insert("maxLength".into(), json!(max_length));
                }
                if let Some(pattern) = &validations.pattern {
                    node.insert("pattern".into(), json!(pattern));
                }
            }
        }
        FieldType::Number => {
            node.insert("type".into(), json!("number"));
            if let Some(validations) = &field.validations {
                if let Some(min) = validations.min {
                    node.insert("minimum".into(), json!(min));
                }
                if let Some(max) = validations.max {
                    node.insert("maximum".into(), json!(max));
                }
            }
        }
        FieldType::Select => {
            node.insert("type".into(), json!("string"));
            if !field.options.is_empty() {
                node.insert("enum".into(), json!(field.options));
            }
        }
        FieldType::Multiselect => {
            node.insert("type".into(), json!("array"));
            let items = if field.options.is_empty() {
                json!({"type": "string"})
            } else {
                json!({"type": "string", "enum": field.options})
            };
            node.insert("items".into(), items);
        }
        FieldType::Date => {
            node.insert("type".into(), json!("string"));
            node.insert("format".into(), json!("date"));
        }
        FieldType::Boolean => {
            node.insert("type".into(), json!("boolean"));
        }
    }

    Value::Object(node)
}
