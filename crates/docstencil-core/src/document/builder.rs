//! Fluent construction of document trees.

use super::{
    ContentType, ControlData, DocumentTree, DropdownAlternative, ImageData, NodeId, NodeKind,
    TextLeaf,
};

/// Builds a [`DocumentTree`] top-down.
///
/// Nested structure is expressed with closures; each control scopes its
/// closure to the control's content region:
///
/// ```
/// use docstencil_core::document::{ContentType, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder
///     .text("Hello ")
///     .control("variable_name", ContentType::PlainText, |b| {
///         b.placeholder("NAME");
///     });
/// let tree = builder.build();
/// assert_eq!(tree.rendered_text(), "Hello NAME");
/// ```
pub struct TreeBuilder {
    tree: DocumentTree,
    cursors: Vec<NodeId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        let tree = DocumentTree::new();
        let root = tree.root();
        Self {
            tree,
            cursors: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.cursors.last().copied().unwrap_or_else(|| self.tree.root())
    }

    pub fn text(&mut self, value: &str) -> &mut Self {
        self.tree.add_node(
            self.current(),
            NodeKind::Text(TextLeaf {
                value: value.to_string(),
                placeholder: false,
            }),
        );
        self
    }

    /// Text carrying the authoring tool's placeholder styling.
    pub fn placeholder(&mut self, value: &str) -> &mut Self {
        self.tree.add_node(
            self.current(),
            NodeKind::Text(TextLeaf {
                value: value.to_string(),
                placeholder: true,
            }),
        );
        self
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.tree.add_node(self.current(), NodeKind::LineBreak);
        self
    }

    pub fn image(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.tree
            .add_node(self.current(), NodeKind::Image(ImageData { bytes }));
        self
    }

    /// A grouping node, like a paragraph or table cell.
    pub fn section(&mut self, f: impl FnOnce(&mut TreeBuilder)) -> &mut Self {
        let section = self.tree.add_node(self.current(), NodeKind::Section);
        self.cursors.push(section);
        f(self);
        self.cursors.pop();
        self
    }

    /// A tagged control; the closure fills its content region.
    pub fn control(
        &mut self,
        tag: &str,
        content_type: ContentType,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> &mut Self {
        self.control_node(Some(tag.to_string()), content_type, Vec::new(), f)
    }

    /// A control without a tag; no replacer will ever match it.
    pub fn untagged_control(
        &mut self,
        content_type: ContentType,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> &mut Self {
        self.control_node(None, content_type, Vec::new(), f)
    }

    /// A dropdown control with its pre-authored alternatives.
    pub fn dropdown(
        &mut self,
        tag: &str,
        alternatives: Vec<DropdownAlternative>,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> &mut Self {
        self.control_node(Some(tag.to_string()), ContentType::Dropdown, alternatives, f)
    }

    fn control_node(
        &mut self,
        tag: Option<String>,
        content_type: ContentType,
        alternatives: Vec<DropdownAlternative>,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> &mut Self {
        let control = self.tree.add_node(
            self.current(),
            NodeKind::Control(ControlData {
                tag,
                content_type,
                alternatives,
            }),
        );
        let content = self.tree.add_node(control, NodeKind::Content);
        self.cursors.push(content);
        f(self);
        self.cursors.pop();
        self
    }

    pub fn build(self) -> DocumentTree {
        self.tree
    }
}
