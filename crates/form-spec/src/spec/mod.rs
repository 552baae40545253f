pub mod field;
pub mod form;
pub mod rule;

pub use field::{FieldDefinition, FieldType, FieldValidations};
pub use form::FormSchema;
pub use rule::{RuleOperator, VisibilityRule};
