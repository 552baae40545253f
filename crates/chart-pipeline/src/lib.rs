#![allow(missing_docs)]

pub mod builder;
pub mod datetime;
pub mod engine;
pub mod pipeline;
pub mod shape;
pub mod spec;

pub use builder::build_pipeline;
pub use engine::{GroupRow, SubmissionDocument, execute};
pub use pipeline::{
    Accumulator, FieldRef, GroupKeySpec, Predicate, PipelineDescriptor, TimeKeySpec,
};
pub use shape::{AggregationPoint, shape};
pub use spec::{Aggregation, COUNT_MEASURE, ChartFilter, ChartSpec, FilterOperator, TimeBucket};
