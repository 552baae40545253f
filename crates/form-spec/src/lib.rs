#![allow(missing_docs)]

pub mod schema;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use schema::generate as submission_schema;
pub use spec::{
    FieldDefinition, FieldType, FieldValidations, FormSchema, RuleOperator, VisibilityRule,
};
pub use validate::{SpecError, ValidationError, validate, validate_field};
pub use visibility::{VisibleSet, visible_fields};
