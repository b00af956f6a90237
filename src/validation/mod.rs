//! The validation engine: rule primitives, per-resource rule sets, the
//! document validator and the report it produces.

pub mod report;
pub mod resources;
pub mod rules;
mod validator;


pub use report::{
    CollectionError, FieldPath, Finding, FindingKind, PathSegment, ReportEntry, ValidationReport,
};
pub use resources::{ResourceType, ResourceTypeSpec};
pub use rules::Rule;
pub use validator::{Document, DocumentError, Validator, validate_value};
