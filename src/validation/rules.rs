//! Field rule primitives and the rule table entries built from them.

use crate::value::{Kind, Mapping, Value};

use super::report::{FieldPath, Finding, FindingKind};

/// Reports a missing field.
pub fn require_field(descriptor: &Mapping, field: &'static str) -> Option<FindingKind> {
    if descriptor.contains_key(field) {
        None
    } else {
        Some(FindingKind::MissingField { field })
    }
}

/// Reports a present field whose value has the wrong kind. Absence is fine.
pub fn require_type(
    descriptor: &Mapping,
    field: &'static str,
    expected: Kind,
) -> Option<FindingKind> {
    let found = descriptor.get(field)?.kind();
    (found != expected).then_some(FindingKind::WrongType {
        field: Some(field),
        expected,
        found,
    })
}

/// Reports a present value outside `allowed`. Only strings can be members.
pub fn require_enum(
    value: Option<&Value>,
    field: &'static str,
    allowed: &'static [&'static str],
) -> Option<FindingKind> {
    let value = value?;
    let member = value.as_str().is_some_and(|s| allowed.contains(&s));
    (!member).then(|| FindingKind::NotInEnum {
        field,
        value: value.to_string(),
        allowed,
    })
}

/// Reports when `option` is absent and the group is incomplete.
pub fn require_either(
    descriptor: &Mapping,
    option: &'static str,
    group: &'static [&'static str],
) -> Option<FindingKind> {
    if descriptor.contains_key(option) {
        return None;
    }
    let group_complete = group.iter().all(|field| descriptor.contains_key(*field));
    (!group_complete).then_some(FindingKind::MissingEither { option, group })
}

/// Shape check only: a string containing '/'. Address and prefix are not parsed.
pub fn require_cidr(descriptor: &Mapping, field: &'static str) -> Option<FindingKind> {
    let value = descriptor.get(field)?;
    let well_formed = value.as_str().is_some_and(|s| s.contains('/'));
    (!well_formed).then(|| FindingKind::InvalidCidr {
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required(&'static str),
    Type(&'static str, Kind),
    Enum {
        field: &'static str,
        allowed: &'static [&'static str],
    },
    Either {
        option: &'static str,
        group: &'static [&'static str],
    },
    Cidr(&'static str),
    /// Each element of a sequence field must be a mapping satisfying `rules`.
    /// Non-sequence values are left to a `Type` rule.
    Items {
        field: &'static str,
        label: &'static str,
        rules: &'static [Rule],
    },
}

impl Rule {
    /// Appends this rule's findings for `descriptor`, located under `base`.
    pub fn apply(
        &self,
        descriptor: &Mapping,
        subject: &str,
        base: &FieldPath,
        out: &mut Vec<Finding>,
    ) {
        let (path, kind) = match *self {
            Rule::Required(field) => (base.field(field), require_field(descriptor, field)),
            Rule::Type(field, expected) => {
                (base.field(field), require_type(descriptor, field, expected))
            }
            Rule::Enum { field, allowed } => (
                base.field(field),
                require_enum(descriptor.get(field), field, allowed),
            ),
            Rule::Either { option, group } => {
                (base.clone(), require_either(descriptor, option, group))
            }
            Rule::Cidr(field) => (base.field(field), require_cidr(descriptor, field)),
            Rule::Items {
                field,
                label,
                rules,
            } => {
                apply_items(descriptor, field, label, rules, base, out);
                return;
            }
        };

        if let Some(kind) = kind {
            out.push(Finding {
                subject: subject.to_string(),
                path,
                kind,
            });
        }
    }
}

fn apply_items(
    descriptor: &Mapping,
    field: &'static str,
    label: &'static str,
    rules: &'static [Rule],
    base: &FieldPath,
    out: &mut Vec<Finding>,
) {
    let Some(items) = descriptor.get(field).and_then(Value::as_sequence) else {
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let subject = format!("{label} at index {index}");
        let item_path = base.field(field).index(index);

        let Some(item) = item.as_mapping() else {
            out.push(Finding {
                subject,
                path: item_path,
                kind: FindingKind::WrongType {
                    field: None,
                    expected: Kind::Mapping,
                    found: item.kind(),
                },
            });
            continue;
        };

        for rule in rules {
            rule.apply(item, &subject, &item_path, out);
        }
    }
}
