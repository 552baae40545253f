use serde_json::{Value, json};

use form_spec::{FormSchema, submission_schema, validate, visible_fields};

fn survey_schema() -> FormSchema {
    serde_json::from_value(json!({
        "id": "survey-1",
        "title": "Relocation survey",
        "fields": [
            {"key": "name", "label": "Name", "type": "text", "required": true, "order": 0},
            {"key": "wants_contact", "label": "Contact me", "type": "boolean", "order": 1},
            {
                "key": "email", "label": "Email", "type": "text", "required": true, "order": 2,
                "validations": {"pattern": "^[^@]+@[^@]+$", "message": "Enter a valid email"},
            },
            {
                "key": "age", "label": "Age", "type": "number", "order": 3,
                "validations": {"min": 18.0, "max": 99.0},
            },
        ],
        "rules": [
            {
                "targetFieldKey": "email",
                "sourceFieldKey": "wants_contact",
                "operator": "equals",
                "value": true,
            },
        ],
    }))
    .unwrap()
}

#[test]
fn valid_payload_produces_no_errors() {
    let schema = survey_schema();
    let payload = json!({"name": "Ada", "wants_contact": true, "email": "ada@example.com", "age": 36});
    assert_eq!(validate(&schema, &payload).unwrap(), vec![]);
}

#[test]
fn errors_come_back_in_field_declaration_order() {
    let schema = survey_schema();
    let payload = json!({"wants_contact": true, "email": "not-an-email", "age": 12});
    let errors = validate(&schema, &payload).unwrap();
    let fields: Vec<&str> = errors.iter().map(|error| error.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email", "age"]);
    assert_eq!(errors[1].message, "Enter a valid email");
    assert_eq!(errors[2].message, "Must be at least 18");
}

#[test]
fn hidden_required_field_never_blocks() {
    let schema = survey_schema();
    // wants_contact is false, so the required email field is hidden.
    let payload = json!({"name": "Ada", "wants_contact": false});
    assert_eq!(validate(&schema, &payload).unwrap(), vec![]);
}

#[test]
fn validation_is_idempotent() {
    let schema = survey_schema();
    let payload = json!({"wants_contact": true, "age": "abc"});
    let first = validate(&schema, &payload).unwrap();
    let second = validate(&schema, &payload).unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_object_payload_is_a_hard_error() {
    let schema = survey_schema();
    let error = validate(&schema, &json!(["not", "a", "map"])).unwrap_err();
    assert!(error.to_string().contains("JSON object"));
}

#[test]
fn visible_set_follows_rule_source_value() {
    let schema = survey_schema();
    let shown = visible_fields(&schema, json!({"wants_contact": true}).as_object().unwrap());
    assert!(shown.contains("email"));
    let hidden = visible_fields(&schema, json!({"wants_contact": false}).as_object().unwrap());
    assert!(!hidden.contains("email"));
}

#[test]
fn submission_schema_tracks_visibility() {
    let schema = survey_schema();
    let data = json!({"wants_contact": false});
    let visible = visible_fields(&schema, data.as_object().unwrap());
    let generated = submission_schema(&schema, &visible);

    let properties = generated["properties"].as_object().unwrap();
    assert!(properties.contains_key("name"));
    assert!(!properties.contains_key("email"));
    assert_eq!(properties["age"]["minimum"], json!(18.0));

    let required: Vec<&str> = generated["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(required, vec!["name"]);
}

#[test]
fn display_order_is_separate_from_declaration_order() {
    let mut schema = survey_schema();
    schema.fields[0].order = 9;
    let ordered: Vec<&str> = schema
        .fields_by_order()
        .iter()
        .map(|field| field.key.as_str())
        .collect();
    assert_eq!(ordered, vec!["wants_contact", "email", "age", "name"]);

    // Validation still walks declaration order.
    let errors = validate(&schema, &json!({"wants_contact": true})).unwrap();
    let fields: Vec<&str> = errors.iter().map(|error| error.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email"]);
}

#[test]
fn field_order_survives_a_round_trip() {
    let schema = survey_schema();
    let encoded = serde_json::to_value(&schema).unwrap();
    let decoded: FormSchema = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, schema);
    let orders: Vec<i64> = decoded.fields.iter().map(|field| field.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}
