use std::collections::BTreeMap;
use std::fmt;

use crate::value::Kind;

use super::resources::ResourceType;

/// One step of a path from a resource element down to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &'static str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    MissingField {
        field: &'static str,
    },
    WrongType {
        field: Option<&'static str>,
        expected: Kind,
        found: Kind,
    },
    NotInEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    MissingEither {
        option: &'static str,
        group: &'static [&'static str],
    },
    InvalidCidr {
        value: String,
    },
}

/// A single violation on one resource element.
///
/// `subject` names the thing being checked ("S3 bucket", "DynamoDB attribute
/// at index 2") and `path` addresses the field relative to the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub subject: String,
    pub path: FieldPath,
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = &self.subject;
        match &self.kind {
            FindingKind::MissingField { field } => {
                write!(f, "{subject} missing required '{field}' field")
            }
            FindingKind::WrongType {
                field: Some(field),
                expected,
                found,
            } => write!(f, "{subject} {field} must be a {expected}, got {found}"),
            FindingKind::WrongType {
                field: None,
                expected,
                found,
            } => write!(f, "{subject} must be a {expected}, got {found}"),
            FindingKind::NotInEnum {
                field,
                value,
                allowed,
            } => {
                let allowed = allowed
                    .iter()
                    .map(|a| format!("'{a}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{subject} {field} must be one of [{allowed}], got '{value}'")
            }
            FindingKind::MissingEither { option, group } => {
                write!(
                    f,
                    "{subject} must specify either '{option}' or {}",
                    describe_group(group)
                )
            }
            FindingKind::InvalidCidr { value } => write!(
                f,
                "{subject} CIDR block '{value}' is not in valid format (e.g., '10.0.0.0/16')"
            ),
        }
    }
}

fn describe_group(group: &[&str]) -> String {
    let quoted: Vec<String> = group.iter().map(|g| format!("'{g}'")).collect();
    match quoted.as_slice() {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [a, b] => format!("both {a} and {b}"),
        [init @ .., last] => format!("all of {} and {last}", init.join(", ")),
    }
}

/// Why a whole collection could not be checked element by element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    NotASequence { found: Kind },
    ItemNotMapping { index: usize, found: Kind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// The collection itself has the wrong shape; its elements were skipped.
    Collection {
        key: &'static str,
        error: CollectionError,
    },
    /// One element with at least one finding.
    Element {
        label: &'static str,
        index: usize,
        findings: Vec<Finding>,
    },
}

impl ReportEntry {
    pub fn is_structural(&self) -> bool {
        matches!(self, ReportEntry::Collection { .. })
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            ReportEntry::Collection { .. } => &[],
            ReportEntry::Element { findings, .. } => findings,
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEntry::Collection {
                key,
                error: CollectionError::NotASequence { found },
            } => write!(f, "{key} must be a list, got {found}"),
            ReportEntry::Collection {
                key,
                error: CollectionError::ItemNotMapping { index, found },
            } => write!(
                f,
                "{key} must be a list of mappings, item at index {index} is a {found}"
            ),
            ReportEntry::Element {
                label,
                index,
                findings,
            } => {
                write!(f, "{label} at index {index}: ")?;
                for (i, finding) in findings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{finding}")?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of one validation pass. Empty means the document is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: BTreeMap<ResourceType, Vec<ReportEntry>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, resource_type: ResourceType, entry: ReportEntry) {
        self.entries.entry(resource_type).or_default().push(entry);
    }

    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_structural_errors(&self) -> bool {
        self.entries
            .values()
            .flatten()
            .any(ReportEntry::is_structural)
    }

    pub fn get(&self, resource_type: ResourceType) -> Option<&[ReportEntry]> {
        self.entries.get(&resource_type).map(Vec::as_slice)
    }

    /// Resource types with errors, in the fixed checking order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &[ReportEntry])> {
        self.entries
            .iter()
            .map(|(resource_type, entries)| (*resource_type, entries.as_slice()))
    }

    /// Every finding with the element index it belongs to.
    pub fn findings(&self) -> impl Iterator<Item = (ResourceType, usize, &Finding)> {
        self.iter().flat_map(|(resource_type, entries)| {
            entries.iter().flat_map(move |entry| match entry {
                ReportEntry::Element {
                    index, findings, ..
                } => findings
                    .iter()
                    .map(|finding| (resource_type, *index, finding))
                    .collect::<Vec<_>>(),
                ReportEntry::Collection { .. } => Vec::new(),
            })
        })
    }

    /// One summary line per entry, grouped by resource-type key in checking order.
    pub fn summaries(&self) -> Vec<(&'static str, Vec<String>)> {
        self.iter()
            .map(|(resource_type, entries)| {
                (
                    resource_type.key(),
                    entries.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }
}
