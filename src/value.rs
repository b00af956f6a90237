//! Tagged value model the validation engine works on.
//!
//! Documents arrive as `serde_yaml::Value`; they are converted once into
//! [`Value`] so every rule matches on an explicit variant instead of probing
//! a loosely typed tree.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub type Mapping = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// The variant tag of a [`Value`], used in type rules and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Sequence => "list",
            Kind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Sequence(_) => Kind::Sequence,
            Value::Mapping(_) => Kind::Mapping,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a field on a mapping. Non-mappings have no fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(field))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("unsupported mapping key at '{path}': keys must be scalars")]
    ComplexKey { path: String },
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ValueError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        convert(value, "")
    }
}

fn convert(value: serde_yaml::Value, path: &str) -> Result<Value, ValueError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| convert(item, &format!("{path}/{i}")))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, item) in map {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Null => "null".to_string(),
                    _ => {
                        return Err(ValueError::ComplexKey {
                            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
                        });
                    }
                };
                let item_path = format!("{path}/{key}");
                out.insert(key, convert(item, &item_path)?);
            }
            Value::Mapping(out)
        }
        Yaml::Tagged(tagged) => convert(tagged.value, path)?,
    })
}
