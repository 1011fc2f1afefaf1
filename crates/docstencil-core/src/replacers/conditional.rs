use crate::conditions;
use crate::document::{DocumentTree, NodeId};
use crate::error::Result;
use crate::replacers::{Outcome, Replacer};
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Deletes a control subtree when its conditional expression is false.
pub struct ConditionalRemoveReplacer {
    prefix: String,
}

impl ConditionalRemoveReplacer {
    pub fn new() -> Self {
        Self::with_prefix("conditionalRemove")
    }

    /// Same behavior under another tag prefix. Repeating sections register
    /// an alias for their per-item conditionals.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for ConditionalRemoveReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer for ConditionalRemoveReplacer {
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
        if conditions::evaluate(&tag.identifier, source, &tag.params)? {
            return Ok(Outcome::untouched());
        }
        tree.remove_control(control);
        tracing::debug!("removed conditional section '{}'", tag.identifier);
        Ok(Outcome::removal())
    }
}
