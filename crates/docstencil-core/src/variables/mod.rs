//! Hierarchical variable resolution over a data payload.

mod format;

use std::collections::HashMap;

use crate::data::DataValue;
use crate::error::{EngineError, Result};
use format::NumericFormat;

/// Resolves dotted identifiers against a mapping of data values.
///
/// Identifiers walk nested mappings by name (`address.street`) and lists by
/// bracketed index (`phones.[0]`). A trailing parenthesized specifier
/// formats numeric terminals (`balance(n2)`).
#[derive(Debug, Clone)]
pub struct VariableSource {
    root: HashMap<String, DataValue>,
    strict: bool,
}

enum Walked<'a> {
    Found(&'a DataValue),
    Missing,
}

impl VariableSource {
    /// Builds a strict source over `root`.
    pub fn new(root: HashMap<String, DataValue>) -> Self {
        Self { root, strict: true }
    }

    /// Empty source; every lookup misses.
    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    /// Builds a strict source from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(DataValue::from_json(json)?)
    }

    /// Builds a strict source from an already parsed value, which must be a
    /// mapping.
    pub fn from_value(value: DataValue) -> Result<Self> {
        match value {
            DataValue::Map(root) => Ok(Self::new(root)),
            other => Err(EngineError::DataParseError(format!(
                "payload root must be a mapping, found {}",
                other.type_name()
            ))),
        }
    }

    /// Switches to lenient resolution: a missing name yields `Absent` for
    /// the whole identifier instead of an error.
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// A source scoped to `fields`, inheriting this source's strictness.
    ///
    /// Used when descending into one item of a repeating section or into a
    /// record behind a rich text control.
    pub fn narrowed(&self, fields: HashMap<String, DataValue>) -> Self {
        Self {
            root: fields,
            strict: self.strict,
        }
    }

    /// Resolves `identifier` to a value.
    pub fn resolve(&self, identifier: &str) -> Result<DataValue> {
        tracing::trace!("resolving '{}'", identifier);
        if let Some((path, format)) = NumericFormat::split(identifier) {
            return match self.walk(path, identifier)? {
                Walked::Found(value) if !value.is_absent() => {
                    format.render(value, identifier).map(DataValue::String)
                }
                // absent terminals render as the empty string under a format
                _ => Ok(DataValue::String(String::new())),
            };
        }
        match self.walk(identifier, identifier)? {
            Walked::Found(DataValue::Absent) => Err(EngineError::IncorrectIdentifier {
                identifier: identifier.to_string(),
                reason: "identifier resolves to an explicit null".to_string(),
            }),
            Walked::Found(value) => Ok(value.clone()),
            Walked::Missing => Ok(DataValue::Absent),
        }
    }

    /// Resolves `identifier` and requires a list.
    pub fn resolve_list(&self, identifier: &str) -> Result<Vec<DataValue>> {
        match self.resolve(identifier)? {
            DataValue::List(items) => Ok(items),
            other => Err(EngineError::IncorrectType {
                identifier: identifier.to_string(),
                expected: "list",
                found: other.type_name(),
            }),
        }
    }

    /// Resolves `identifier` and requires a scalar, rendered as text.
    pub fn resolve_text(&self, identifier: &str) -> Result<String> {
        let value = self.resolve(identifier)?;
        value
            .scalar_text()
            .ok_or_else(|| EngineError::IncorrectType {
                identifier: identifier.to_string(),
                expected: "a scalar value",
                found: value.type_name(),
            })
    }

    fn walk<'a>(&'a self, path: &str, identifier: &str) -> Result<Walked<'a>> {
        if self.root.is_empty() {
            return Ok(Walked::Missing);
        }

        // One cursor is armed after each segment, depending on the shape of
        // the value the segment produced. A scalar clears both, so any
        // further segment is an error.
        let mut map_cursor: Option<&'a HashMap<String, DataValue>> = Some(&self.root);
        let mut list_cursor: Option<&'a Vec<DataValue>> = None;
        let mut last: Option<&'a DataValue> = None;

        for segment in path.split('.') {
            let value = if segment.contains('[') && segment.contains(']') {
                let Some(items) = list_cursor else {
                    return Err(bad_segment(identifier, segment, "no list to index into"));
                };
                let digits = segment.replace(['[', ']'], "");
                let index: usize = digits
                    .parse()
                    .map_err(|_| bad_segment(identifier, segment, "index is not a number"))?;
                items
                    .get(index)
                    .ok_or_else(|| bad_segment(identifier, segment, "index is out of bounds"))?
            } else {
                let Some(fields) = map_cursor else {
                    return Err(bad_segment(identifier, segment, "no mapping to look into"));
                };
                match fields.get(segment) {
                    Some(value) => value,
                    None if self.strict => {
                        return Err(EngineError::VariableNotFound {
                            identifier: identifier.to_string(),
                        });
                    }
                    None => return Ok(Walked::Missing),
                }
            };

            match value {
                DataValue::Map(fields) => {
                    map_cursor = Some(fields);
                    list_cursor = None;
                }
                DataValue::List(items) => {
                    list_cursor = Some(items);
                    map_cursor = None;
                }
                _ => {
                    map_cursor = None;
                    list_cursor = None;
                }
            }
            last = Some(value);
        }

        match last {
            Some(value) => Ok(Walked::Found(value)),
            None => Ok(Walked::Missing),
        }
    }
}

/// Shorthand for the identifier errors the walk raises.
fn bad_segment(identifier: &str, segment: &str, reason: &str) -> EngineError {
    EngineError::IncorrectIdentifier {
        identifier: identifier.to_string(),
        reason: format!("segment '{}': {}", segment, reason),
    }
}
