//! Pluggable control replacers.
//!
//! Each replacer owns a tag prefix and decides what happens to the controls
//! carrying it. Replacers never call each other; when one needs other
//! controls resolved under a narrower data scope it hands the engine a
//! [`WorkItem`] and the engine schedules it after everything already queued.

mod conditional;
mod dropdown;
mod picture;
mod repeating;
mod variable;

pub use conditional::ConditionalRemoveReplacer;
pub use dropdown::{ConditionalDropdownReplacer, SingularDropdownReplacer};
pub use picture::PictureReplacer;
pub use repeating::RepeatingReplacer;
pub use variable::VariableReplacer;

use crate::document::{ContentType, DocumentTree, NodeId};
use crate::error::Result;
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Deferred resolution work: a set of controls paired with the data scope
/// they must resolve against.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub controls: Vec<NodeId>,
    pub source: VariableSource,
    pub(crate) depth: u32,
}

impl WorkItem {
    pub fn new(controls: Vec<NodeId>, source: VariableSource) -> Self {
        Self {
            controls,
            source,
            depth: 0,
        }
    }
}

/// What a replacer did with a control.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Text the engine should write into the control. `None` leaves the
    /// content alone.
    pub rendered: Option<String>,
    /// The control subtree was detached.
    pub removed: bool,
    /// An image payload was embedded.
    pub embedded: bool,
    /// Number of subtree copies created by an expansion.
    pub clones: usize,
    /// Follow-up work for the engine to queue.
    pub work: Vec<WorkItem>,
}

impl Outcome {
    pub fn untouched() -> Self {
        Self::default()
    }

    pub fn text(value: impl Into<String>) -> Self {
        Outcome {
            rendered: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn removal() -> Self {
        Outcome {
            removed: true,
            ..Self::default()
        }
    }

    pub fn embed() -> Self {
        Outcome {
            embedded: true,
            ..Self::default()
        }
    }

    pub fn descend(work: WorkItem) -> Self {
        Outcome {
            work: vec![work],
            ..Self::default()
        }
    }

    pub fn expansion(clones: usize, work: Vec<WorkItem>) -> Self {
        Outcome {
            clones,
            work,
            ..Self::default()
        }
    }
}

pub trait Replacer {
    /// Tag prefix this replacer owns, matched case-insensitively.
    fn prefix(&self) -> &str;

    /// Content type this replacer is restricted to. `Undefined` matches any.
    fn restriction(&self) -> ContentType {
        ContentType::Undefined
    }

    /// Parses the control's tag against this replacer's prefix and checks
    /// the content type restriction.
    fn matches(&self, tree: &DocumentTree, control: NodeId) -> Option<ParsedTag> {
        let parsed = ParsedTag::parse(tree.control_tag(control), self.prefix())?;
        match self.restriction() {
            ContentType::Undefined => Some(parsed),
            required if tree.control_content_type(control) == required => Some(parsed),
            _ => None,
        }
    }

    /// Acts on one matched control. The engine has already checked
    /// attachment, scope and the tag, and will apply the returned outcome.
    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TreeBuilder;

    struct Renamer;

    impl Replacer for Renamer {
        fn prefix(&self) -> &str {
            "rename"
        }

        fn restriction(&self) -> ContentType {
            ContentType::PlainText
        }

        fn process(
            &self,
            _tree: &mut DocumentTree,
            _control: NodeId,
            tag: &ParsedTag,
            _source: &VariableSource,
        ) -> Result<Outcome> {
            Ok(Outcome::text(tag.identifier.clone()))
        }
    }

    #[test]
    fn test_matches_checks_prefix_and_restriction() {
        let mut builder = TreeBuilder::new();
        builder
            .control("rename_a", ContentType::PlainText, |b| {
                b.text("x");
            })
            .control("rename_b", ContentType::RichText, |b| {
                b.text("x");
            })
            .control("other_c", ContentType::PlainText, |b| {
                b.text("x");
            });
        let tree = builder.build();
        let controls = tree.controls();
        let replacer = Renamer;

        let matched = replacer.matches(&tree, controls[0]).unwrap();
        assert_eq!(matched.identifier, "a");

        // wrong content type
        assert!(replacer.matches(&tree, controls[1]).is_none());
        // wrong prefix
        assert!(replacer.matches(&tree, controls[2]).is_none());
    }

    #[test]
    fn test_unrestricted_replacer_matches_any_content_type() {
        struct Loose;
        impl Replacer for Loose {
            fn prefix(&self) -> &str {
                "loose"
            }
            fn process(
                &self,
                _tree: &mut DocumentTree,
                _control: NodeId,
                _tag: &ParsedTag,
                _source: &VariableSource,
            ) -> Result<Outcome> {
                Ok(Outcome::untouched())
            }
        }

        let mut builder = TreeBuilder::new();
        builder.control("loose_x", ContentType::Picture, |b| {
            b.text("x");
        });
        let tree = builder.build();
        assert!(Loose.matches(&tree, tree.controls()[0]).is_some());
    }
}
