use serde_json::Value;

use crate::datetime::parse_timestamp;
use crate::pipeline::{
    Accumulator, FieldRef, GroupKeySpec, Predicate, PipelineDescriptor, TimeKeySpec,
};
use crate::spec::{Aggregation, COUNT_MEASURE, ChartFilter, ChartSpec, FilterOperator};

/// Compiles a chart spec into an engine-agnostic pipeline descriptor.
///
/// The predicate always opens with an equality clause on the owning form
/// id. Unknown filter operators and malformed value shapes compile to
/// nothing rather than failing the whole chart.
pub fn build_pipeline(spec: &ChartSpec) -> PipelineDescriptor {
    let mut clauses = vec![Predicate::Eq {
        field: FieldRef::FormId,
        value: Value::String(spec.form_id.clone()),
    }];
    for filter in &spec.filters {
        compile_filter(filter, &mut clauses);
    }

    let time = match (spec.time_bucket, &spec.time_field_key) {
        (Some(bucket), Some(field_key)) => Some(TimeKeySpec {
            field_key: field_key.clone(),
            bucket,
        }),
        _ => None,
    };

    PipelineDescriptor {
        predicate: Predicate::All(clauses),
        group_key: GroupKeySpec {
            dimension: spec.dimension.clone(),
            time,
        },
        accumulator: compile_accumulator(spec),
    }
}

fn compile_filter(filter: &ChartFilter, clauses: &mut Vec<Predicate>) {
    if filter.field_key.is_empty() {
        return;
    }
    let field = FieldRef::Data(filter.field_key.clone());

    match filter.operator {
        FilterOperator::Eq => clauses.push(Predicate::Eq {
            field,
            value: filter.value.clone(),
        }),
        FilterOperator::In => {
            let values = match &filter.value {
                Value::Array(items) => items.clone(),
                scalar => vec![scalar.clone()],
            };
            clauses.push(Predicate::In { field, values });
        }
        FilterOperator::Range => {
            let Some(bounds) = filter.value.as_object() else {
                return;
            };
            if let Some(min) = bounds.get("min") {
                clauses.push(Predicate::AtLeast {
                    field: field.clone(),
                    bound: min.clone(),
                });
            }
            if let Some(max) = bounds.get("max") {
                clauses.push(Predicate::AtMost {
                    field,
                    bound: max.clone(),
                });
            }
        }
        FilterOperator::DateRange => {
            let Some(bounds) = filter.value.as_object() else {
                return;
            };
            let parse = |key: &str| bounds.get(key).and_then(Value::as_str).and_then(parse_timestamp);
            if let Some(from) = parse("from") {
                clauses.push(Predicate::TimeAtLeast {
                    field: field.clone(),
                    bound: from,
                });
            }
            if let Some(to) = parse("to") {
                clauses.push(Predicate::TimeAtMost { field, bound: to });
            }
        }
        FilterOperator::Unknown => {}
    }
}

fn compile_accumulator(spec: &ChartSpec) -> Accumulator {
    if spec.measure == COUNT_MEASURE {
        return Accumulator::Count;
    }
    let measure = spec.measure.clone();
    match spec.aggregation {
        Aggregation::Count => Accumulator::Count,
        Aggregation::Sum => Accumulator::Sum(measure),
        Aggregation::Avg => Accumulator::Avg(measure),
        Aggregation::Min => Accumulator::Min(measure),
        Aggregation::Max => Accumulator::Max(measure),
    }
}
