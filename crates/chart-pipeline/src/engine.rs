use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::datetime::{bucket_label, parse_timestamp};
use crate::pipeline::{Accumulator, FieldRef, GroupKeySpec, Predicate, PipelineDescriptor};

/// A stored submission as the persistence collaborator keeps it: the
/// payload verbatim under `data`, plus the generated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    #[serde(default)]
    pub id: String,
    pub form_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One grouped row as it leaves the engine, before shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub dimension: Value,
    pub time: Option<String>,
    pub value: Value,
}

/// Reference backend for [`PipelineDescriptor`]: filters, groups, and
/// accumulates over an in-memory document slice, then sorts ascending by
/// time label (rows without one first) and dimension.
///
/// Deterministic for a given input; usable as-is by the CLI and as the
/// executable oracle in tests.
pub fn execute(descriptor: &PipelineDescriptor, documents: &[SubmissionDocument]) -> Vec<GroupRow> {
    let mut groups: Vec<(Option<String>, Value, State)> = Vec::new();

    for document in documents {
        if !eval(&descriptor.predicate, document) {
            continue;
        }
        let time = time_label(&descriptor.group_key, document);
        let dimension = dimension_value(&descriptor.group_key, document);
        let index = match groups
            .iter()
            .position(|(t, d, _)| *t == time && *d == dimension)
        {
            Some(index) => index,
            None => {
                groups.push((time, dimension, State::default()));
                groups.len() - 1
            }
        };
        groups[index].2.fold(&descriptor.accumulator, document);
    }

    let mut rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|(time, dimension, state)| GroupRow {
            value: state.finish(&descriptor.accumulator),
            dimension,
            time,
        })
        .collect();
    rows.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| cmp_values(&a.dimension, &b.dimension)));
    rows
}

/// Running accumulation for one group.
#[derive(Default)]
struct State {
    count: i64,
    sum: f64,
    extreme: Option<Value>,
}

impl State {
    fn fold(&mut self, accumulator: &Accumulator, document: &SubmissionDocument) {
        self.count += 1;
        match accumulator {
            Accumulator::Count => {}
            Accumulator::Sum(field) | Accumulator::Avg(field) => {
                self.sum += numeric(document.data.get(field));
            }
            Accumulator::Min(field) => self.keep(document.data.get(field), Ordering::Less),
            Accumulator::Max(field) => self.keep(document.data.get(field), Ordering::Greater),
        }
    }

    fn keep(&mut self, value: Option<&Value>, wanted: Ordering) {
        let Some(value) = value.filter(|value| !value.is_null()) else {
            return;
        };
        let replace = match &self.extreme {
            Some(current) => cmp_values(value, current) == wanted,
            None => true,
        };
        if replace {
            self.extreme = Some(value.clone());
        }
    }

    fn finish(self, accumulator: &Accumulator) -> Value {
        match accumulator {
            Accumulator::Count => Value::from(self.count),
            Accumulator::Sum(_) => Value::from(self.sum),
            Accumulator::Avg(_) => Value::from(self.sum / self.count as f64),
            Accumulator::Min(_) | Accumulator::Max(_) => self.extreme.unwrap_or(Value::Null),
        }
    }
}

/// Measure coercion for sum/avg: numbers and numeric strings count,
/// everything else (including absence) contributes 0.
fn numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn eval(predicate: &Predicate, document: &SubmissionDocument) -> bool {
    match predicate {
        Predicate::All(clauses) => clauses.iter().all(|clause| eval(clause, document)),
        Predicate::Eq { field, value } => resolve(document, field) == *value,
        Predicate::In { field, values } => {
            let actual = resolve(document, field);
            values.iter().any(|candidate| *candidate == actual)
        }
        Predicate::AtLeast { field, bound } => {
            cmp_comparable(&resolve(document, field), bound).is_some_and(|o| o != Ordering::Less)
        }
        Predicate::AtMost { field, bound } => {
            cmp_comparable(&resolve(document, field), bound).is_some_and(|o| o != Ordering::Greater)
        }
        Predicate::TimeAtLeast { field, bound } => {
            resolved_time(document, field).is_some_and(|ts| ts >= *bound)
        }
        Predicate::TimeAtMost { field, bound } => {
            resolved_time(document, field).is_some_and(|ts| ts <= *bound)
        }
    }
}

fn resolve(document: &SubmissionDocument, field: &FieldRef) -> Value {
    match field {
        FieldRef::FormId => Value::String(document.form_id.clone()),
        FieldRef::Data(key) => document.data.get(key).cloned().unwrap_or(Value::Null),
    }
}

fn resolved_time(document: &SubmissionDocument, field: &FieldRef) -> Option<DateTime<Utc>> {
    match resolve(document, field) {
        Value::String(text) => parse_timestamp(&text),
        _ => None,
    }
}

fn dimension_value(group_key: &GroupKeySpec, document: &SubmissionDocument) -> Value {
    match document.data.get(&group_key.dimension) {
        Some(value) if !value.is_null() => value.clone(),
        _ => Value::String("N/A".into()),
    }
}

fn time_label(group_key: &GroupKeySpec, document: &SubmissionDocument) -> Option<String> {
    let key = group_key.time.as_ref()?;
    let value = document.data.get(&key.field_key)?;
    let timestamp = parse_timestamp(value.as_str()?)?;
    Some(bucket_label(timestamp, key.bucket))
}

/// Same-type comparison for range bounds: numbers numerically, strings
/// lexically. Mixed types are incomparable and fail the predicate.
fn cmp_comparable(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => Some(a.as_f64()?.total_cmp(&b.as_f64()?)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Total order over JSON values for min/max and the dimension sort:
/// type rank (null < bool < number < string < array < object), then value.
pub(crate) fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&b.as_f64().unwrap_or(f64::NAN)),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (left, right) in a.iter().zip(b) {
                let ordering = cmp_values(left, right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.len().cmp(&b.len())
        }
        (Value::Object(a), Value::Object(b)) => {
            let a = Value::Object(a.clone()).to_string();
            let b = Value::Object(b.clone()).to_string();
            a.cmp(&b)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
