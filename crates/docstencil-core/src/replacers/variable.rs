use crate::data::DataValue;
use crate::document::{ContentType, DocumentTree, NodeId};
use crate::error::{EngineError, Result};
use crate::replacers::{Outcome, Replacer, WorkItem};
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Substitutes a control's text with the identified value.
///
/// A rich text control bound to a mapping is treated as a record region: the
/// control keeps its layout and its inner controls are queued for resolution
/// against the mapping itself. An unknown identifier blanks the control
/// instead of failing, so optional fields can simply be left out of the
/// payload.
pub struct VariableReplacer {
    prefix: String,
}

impl VariableReplacer {
    pub fn new() -> Self {
        Self::with_prefix("variable")
    }

    /// Same behavior under another tag prefix. Repeating sections register
    /// an alias for their per-item fields.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for VariableReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer for VariableReplacer {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome> {
        let value = match source.resolve(&tag.identifier) {
            Ok(value) => value,
            Err(EngineError::VariableNotFound { .. }) => return Ok(Outcome::text("")),
            Err(err) => return Err(err),
        };

        match value {
            DataValue::Map(fields)
                if tree.control_content_type(control) == ContentType::RichText =>
            {
                let inner = tree.descendant_controls(control);
                tracing::debug!(
                    "descending into record '{}' with {} inner controls",
                    tag.identifier,
                    inner.len()
                );
                Ok(Outcome::descend(WorkItem::new(
                    inner,
                    source.narrowed(fields),
                )))
            }
            DataValue::Absent => Ok(Outcome::text("")),
            other => match other.scalar_text() {
                Some(text) => Ok(Outcome::text(text)),
                None => Err(EngineError::IncorrectType {
                    identifier: tag.identifier.clone(),
                    expected: "a scalar value",
                    found: other.type_name(),
                }),
            },
        }
    }
}
