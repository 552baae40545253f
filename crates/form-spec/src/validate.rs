use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::spec::field::{FieldDefinition, FieldType, FieldValidations};
use crate::spec::form::FormSchema;
use crate::visibility::visible_fields;

/// One field-level rejection, surfaced to the submitter verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Programming-error class: the caller handed the core a payload that is
/// not a JSON object. Expected validation failures never take this path.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("submission payload must be a JSON object, got {kind}")]
    PayloadNotObject { kind: &'static str },
}

/// Validates a submission payload against a form schema.
///
/// Returns the full error list in field-declaration order; an empty list
/// means the payload is acceptable. Fields hidden by the form's rules are
/// never validated, even when marked required.
pub fn validate(schema: &FormSchema, data: &Value) -> Result<Vec<ValidationError>, SpecError> {
    let Some(map) = data.as_object() else {
        return Err(SpecError::PayloadNotObject {
            kind: value_kind(data),
        });
    };

    let visible = visible_fields(schema, map);
    let mut errors = Vec::new();
    for field in &schema.fields {
        if !visible.contains(&field.key) {
            continue;
        }
        errors.extend(validate_field(field, map.get(&field.key)));
    }
    Ok(errors)
}

/// Validates one visible field against its definition.
///
/// Required-and-empty short-circuits with a single error; an empty optional
/// value short-circuits with none. Otherwise every applicable type check
/// runs and errors accumulate.
pub fn validate_field(field: &FieldDefinition, value: Option<&Value>) -> Vec<ValidationError> {
    let value = value.unwrap_or(&Value::Null);
    let empty = FieldValidations::default();
    let validations = field.validations.as_ref().unwrap_or(&empty);

    if field.required && is_empty(value) {
        return vec![ValidationError {
            field: field.key.clone(),
            message: format!("{} is required", field.label),
        }];
    }
    if is_absent(value) {
        return Vec::new();
    }

    let mut errors = Vec::new();
    let mut push = |message: String| {
        errors.push(ValidationError {
            field: field.key.clone(),
            message: validations.message.clone().unwrap_or(message),
        });
    };

    match field.field_type {
        FieldType::Number => match as_number(value) {
            None => push("Must be a number".into()),
            Some(n) => {
                if let Some(min) = validations.min
                    && n < min
                {
                    push(format!("Must be at least {min}"));
                }
                if let Some(max) = validations.max
                    && n > max
                {
                    push(format!("Must be at most {max}"));
                }
            }
        },
        FieldType::Text => {
            let text = as_text(value);
            let length = text.chars().count();
            if let Some(min_length) = validations.min_length
                && length < min_length
            {
                push(format!("Min length {min_length}"));
            }
            if let Some(max_length) = validations.max_length
                && length > max_length
            {
                push(format!("Max length {max_length}"));
            }
            if let Some(pattern) = &validations.pattern
                && let Ok(regex) = Regex::new(pattern)
                && !matches_at_start(&regex, &text)
            {
                push("Invalid format".into());
            }
        }
        FieldType::Date => {
            if !value.as_str().is_some_and(is_iso_date) {
                push("Invalid date".into());
            }
        }
        FieldType::Select => {
            if !field.options.is_empty()
                && !value
                    .as_str()
                    .is_some_and(|text| field.options.iter().any(|option| option == text))
            {
                push("Invalid option".into());
            }
        }
        FieldType::Multiselect => {
            if !field.options.is_empty() {
                let single = [value.clone()];
                let items: &[Value] = match value {
                    Value::Array(items) => items.as_slice(),
                    _ => &single,
                };
                let all_declared = items.iter().all(|item| {
                    item.as_str()
                        .is_some_and(|text| field.options.iter().any(|option| option == text))
                });
                if !all_declared {
                    push("Invalid option(s)".into());
                }
            }
        }
        FieldType::Boolean => {
            let canonical = match value {
                Value::Bool(_) => true,
                Value::String(text) => text == "true" || text == "false",
                Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0 || n == 1.0),
                _ => false,
            };
            if !canonical {
                push("Must be true or false".into());
            }
        }
    }

    errors
}

/// Empty for required-check purposes: null, empty string, or empty list.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Absent for optional fields: null or empty string. An empty list still
/// reaches the type checks.
fn is_absent(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str() == Some("")
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Partial-match semantics anchored at the start of the string: the pattern
/// must match at position 0 but need not consume the whole string.
fn matches_at_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|found| found.start() == 0)
}

/// The date portion (first 10 characters, trailing-Z offset normalized)
/// must parse as an ISO-8601 calendar date.
fn is_iso_date(text: &str) -> bool {
    let normalized = text.replace('Z', "+00:00");
    let date_part: String = normalized.chars().take(10).collect();
    chrono::NaiveDate::parse_from_str(&date_part, "%Y-%m-%d").is_ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
