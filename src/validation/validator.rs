use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::value::{Kind, Mapping, Value};

use super::report::{CollectionError, ReportEntry, ValidationReport};
use super::resources::{ResourceType, ResourceTypeSpec};

/// A document whose shape is too broken to validate at all.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("configuration root must be a mapping of resource collections, got {found}")]
    #[diagnostic(
        code(infraval::document::root),
        help("start the file with keys such as `s3_buckets:` or `vpcs:`")
    )]
    RootNotMapping { found: Kind },
}

/// The root of a configuration file: resource-type keys to collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Document(Mapping);

impl Document {
    pub fn collection(&self, resource_type: ResourceType) -> Option<&Value> {
        self.0.get(resource_type.key())
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Mapping(map) => Ok(Self(map)),
            other => Err(DocumentError::RootNotMapping {
                found: other.kind(),
            }),
        }
    }
}

/// Runs every resource rule set over a document and collects the results.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, document: &Document) -> ValidationReport {
        let mut report = ValidationReport::new();

        for resource_type in ResourceType::ALL {
            let Some(collection) = document.collection(resource_type) else {
                continue;
            };

            let spec = resource_type.spec();
            match elements(collection) {
                Ok(elements) => {
                    debug!(
                        "Checking {} {} element(s)",
                        elements.len(),
                        resource_type.key()
                    );
                    self.validate_collection(spec, &elements, &mut report);
                }
                Err(error) => {
                    debug!("Skipping {}: {:?}", resource_type.key(), error);
                    report.push(
                        resource_type,
                        ReportEntry::Collection {
                            key: resource_type.key(),
                            error,
                        },
                    );
                }
            }
        }

        report
    }

    fn validate_collection(
        &self,
        spec: &ResourceTypeSpec,
        elements: &[&Mapping],
        report: &mut ValidationReport,
    ) {
        for (index, descriptor) in elements.iter().enumerate() {
            let findings = spec.check(descriptor);
            if findings.is_empty() {
                continue;
            }
            report.push(
                spec.resource_type,
                ReportEntry::Element {
                    label: spec.element_label,
                    index,
                    findings,
                },
            );
        }
    }
}

/// A collection is checkable only as a list whose items are all mappings.
fn elements(collection: &Value) -> Result<Vec<&Mapping>, CollectionError> {
    let items = collection
        .as_sequence()
        .ok_or(CollectionError::NotASequence {
            found: collection.kind(),
        })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_mapping().ok_or(CollectionError::ItemNotMapping {
                index,
                found: item.kind(),
            })
        })
        .collect()
}

/// Validates a freshly loaded value, rejecting a non-mapping root.
pub fn validate_value(value: Value) -> Result<ValidationReport, DocumentError> {
    let document = Document::try_from(value)?;
    Ok(Validator::new().validate(&document))
}
