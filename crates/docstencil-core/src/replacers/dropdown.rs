use crate::conditions;
use crate::document::{ContentType, DocumentTree, NodeId};
use crate::error::Result;
use crate::replacers::{Outcome, Replacer};
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Renders one of a dropdown's two alternatives from a conditional: the
/// first when it holds, the second when it does not.
///
/// A dropdown with a single alternative always renders it, and one with no
/// alternatives is left alone; neither case evaluates the conditional.
pub struct ConditionalDropdownReplacer;

impl Replacer for ConditionalDropdownReplacer {
    fn prefix(&self) -> &str {
        "conditional"
    }

    fn restriction(&self) -> ContentType {
        ContentType::Dropdown
    }

    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome> {
        let alternatives = tree.alternatives(control);
        match alternatives.len() {
            0 => Ok(Outcome::untouched()),
            1 => Ok(Outcome::text(alternatives[0].chosen_text())),
            _ => {
                let holds = conditions::evaluate(&tag.identifier, source, &tag.params)?;
                let chosen = if holds {
                    &alternatives[0]
                } else {
                    &alternatives[1]
                };
                Ok(Outcome::text(chosen.chosen_text()))
            }
        }
    }
}

/// Picks between a singular and a plural wording from the length of a list
/// variable: the first alternative for at most one item, the second
/// otherwise.
pub struct SingularDropdownReplacer;

impl Replacer for SingularDropdownReplacer {
    fn prefix(&self) -> &str {
        "singular"
    }

    fn restriction(&self) -> ContentType {
        ContentType::Dropdown
    }

    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome> {
        // the identifier must name a list even when the dropdown turns out
        // to be unusable, so resolve before looking at the alternatives
        let items = source.resolve_list(&tag.identifier)?;
        let alternatives = tree.alternatives(control);
        if alternatives.is_empty() {
            return Ok(Outcome::untouched());
        }
        let chosen = if items.len() <= 1 || alternatives.len() == 1 {
            &alternatives[0]
        } else {
            &alternatives[1]
        };
        Ok(Outcome::text(chosen.chosen_text()))
    }
}
