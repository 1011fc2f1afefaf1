//! Arena document tree with tagged content controls.
//!
//! A document is a tree of nodes owned by a [`DocumentTree`] arena and
//! addressed by [`NodeId`] handles. Controls wrap a single content region
//! whose descendants hold the actual text, line breaks and images. All
//! mutation goes through tree methods, so replacers can hold plain handles
//! while they reshape the document.
//!
//! Removal detaches a subtree from its parent; the arena keeps the nodes,
//! and detached handles simply stop being reachable (`is_attached` reports
//! which is which).

mod builder;

use std::collections::VecDeque;

pub use builder::TreeBuilder;

/// Handle into a [`DocumentTree`]. Only valid for the tree that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What kind of content a control declares it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    PlainText,
    RichText,
    Picture,
    Dropdown,
    Other,
    /// No declared type; matches any replacer restriction.
    Undefined,
}

/// One pre-authored choice of a dropdown control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownAlternative {
    pub display_text: String,
    pub value: Option<String>,
}

impl DropdownAlternative {
    pub fn with_value(display_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            value: Some(value.into()),
        }
    }

    pub fn display_only(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            value: None,
        }
    }

    /// The text this alternative contributes: its value when that is
    /// non-blank, its display text otherwise.
    pub fn chosen_text(&self) -> &str {
        match &self.value {
            Some(value) if !value.trim().is_empty() => value,
            _ => &self.display_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlData {
    pub tag: Option<String>,
    pub content_type: ContentType,
    pub alternatives: Vec<DropdownAlternative>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLeaf {
    pub value: String,
    /// Placeholder styling from the authoring tool; cleared on first write.
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Grouping node with no content of its own.
    Section,
    /// A tagged region a replacer can act on. Has one `Content` child.
    Control(ControlData),
    /// The content region of a control.
    Content,
    Text(TextLeaf),
    LineBreak,
    Image(ImageData),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        let nodes = vec![Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Section,
        }];
        Self {
            nodes,
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn is_control(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Control(_))
    }

    /// Whether `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Every attached control in document order.
    pub fn controls(&self) -> Vec<NodeId> {
        self.collect_controls(self.root)
    }

    /// Every attached control, nearest to the root first.
    pub fn controls_breadth_first(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([self.root]);
        while let Some(current) = queue.pop_front() {
            if self.is_control(current) {
                found.push(current);
            }
            queue.extend(self.node(current).children.iter().copied());
        }
        found
    }

    /// Controls in the subtree under `id`, excluding `id` itself.
    pub fn descendant_controls(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &child in &self.node(id).children {
            found.extend(self.collect_controls(child));
        }
        found
    }

    fn collect_controls(&self, from: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if self.is_control(current) {
                found.push(current);
            }
            for &child in self.node(current).children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    /// The nearest control strictly above `id`.
    pub fn parent_control(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            if self.is_control(ancestor) {
                return Some(ancestor);
            }
            current = self.node(ancestor).parent;
        }
        None
    }

    /// A first-order control sits under no other control.
    pub fn is_first_order(&self, id: NodeId) -> bool {
        self.parent_control(id).is_none()
    }

    pub fn control_tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Control(data) => data.tag.as_deref(),
            _ => None,
        }
    }

    /// Retags a control; no-op for non-control handles.
    pub fn set_control_tag(&mut self, id: NodeId, tag: impl Into<String>) {
        if let NodeKind::Control(data) = &mut self.node_mut(id).kind {
            data.tag = Some(tag.into());
        }
    }

    pub fn control_content_type(&self, id: NodeId) -> ContentType {
        match &self.node(id).kind {
            NodeKind::Control(data) => data.content_type,
            _ => ContentType::Undefined,
        }
    }

    pub fn alternatives(&self, id: NodeId) -> &[DropdownAlternative] {
        match &self.node(id).kind {
            NodeKind::Control(data) => &data.alternatives,
            _ => &[],
        }
    }

    /// The content region of a control.
    pub fn control_content(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| matches!(self.node(child).kind, NodeKind::Content))
    }

    /// First attached control whose full tag equals `tag`.
    pub fn find_control(&self, tag: &str) -> Option<NodeId> {
        self.controls()
            .into_iter()
            .find(|&id| self.control_tag(id) == Some(tag))
    }

    /// All attached controls whose full tag equals `tag`.
    pub fn find_controls(&self, tag: &str) -> Vec<NodeId> {
        self.controls()
            .into_iter()
            .filter(|&id| self.control_tag(id) == Some(tag))
            .collect()
    }

    /// Deep-copies the control subtree and inserts the copy as the sibling
    /// directly before `id`. Returns `None` for detached or non-control
    /// handles.
    pub fn clone_control_before(&mut self, id: NodeId) -> Option<NodeId> {
        if !self.is_control(id) || !self.is_attached(id) {
            return None;
        }
        let parent = self.parent(id)?;
        let copy = self.duplicate_subtree(id);
        let position = self.node(parent).children.iter().position(|&c| c == id)?;
        self.node_mut(parent).children.insert(position, copy);
        self.node_mut(copy).parent = Some(parent);
        Some(copy)
    }

    fn duplicate_subtree(&mut self, source: NodeId) -> NodeId {
        let kind = self.node(source).kind.clone();
        let copy = self.alloc(kind);
        let children = self.node(source).children.clone();
        for child in children {
            let child_copy = self.duplicate_subtree(child);
            self.node_mut(child_copy).parent = Some(copy);
            self.node_mut(copy).children.push(child_copy);
        }
        copy
    }

    /// Detaches the control subtree. Returns false for handles that are not
    /// attached controls.
    pub fn remove_control(&mut self, id: NodeId) -> bool {
        if !self.is_control(id) || !self.is_attached(id) {
            return false;
        }
        self.detach(id);
        true
    }

    /// Rewrites the visible text of a control.
    ///
    /// The first text leaf in the content region is rewritten in place so the
    /// document keeps its character formatting; remaining leaves are removed.
    /// Line breaks in `text` become break nodes between fresh leaves, and any
    /// placeholder styling is dropped.
    pub fn set_control_text(&mut self, id: NodeId, text: &str) {
        if !self.is_control(id) || !self.is_attached(id) {
            return;
        }
        let leaves = self.text_leaves(id);
        for &extra in leaves.iter().skip(1) {
            self.detach(extra);
        }

        let first = match leaves.first().copied() {
            Some(leaf) => leaf,
            None => {
                let Some(content) = self.control_content(id) else {
                    return;
                };
                self.add_node(
                    content,
                    NodeKind::Text(TextLeaf {
                        value: String::new(),
                        placeholder: false,
                    }),
                )
            }
        };

        let lines = split_lines(text);
        if let NodeKind::Text(leaf) = &mut self.node_mut(first).kind {
            leaf.value = lines[0].clone();
            leaf.placeholder = false;
        }

        if lines.len() == 1 {
            return;
        }
        let Some(parent) = self.parent(first) else {
            return;
        };
        let Some(mut at) = self.node(parent).children.iter().position(|&c| c == first) else {
            return;
        };
        at += 1;
        for line in &lines[1..] {
            let br = self.alloc(NodeKind::LineBreak);
            self.node_mut(br).parent = Some(parent);
            self.node_mut(parent).children.insert(at, br);
            at += 1;

            let leaf = self.alloc(NodeKind::Text(TextLeaf {
                value: line.clone(),
                placeholder: false,
            }));
            self.node_mut(leaf).parent = Some(parent);
            self.node_mut(parent).children.insert(at, leaf);
            at += 1;
        }
    }

    /// Appends a text leaf at the end of a control's content region.
    pub fn append_text(&mut self, id: NodeId, text: &str) {
        if !self.is_control(id) || !self.is_attached(id) {
            return;
        }
        let Some(content) = self.control_content(id) else {
            return;
        };
        self.add_node(
            content,
            NodeKind::Text(TextLeaf {
                value: text.to_string(),
                placeholder: false,
            }),
        );
    }

    /// Swaps the bytes of the first image in the control subtree. Controls
    /// without an image placeholder are left alone; returns whether a swap
    /// happened.
    pub fn embed_image(&mut self, id: NodeId, bytes: Vec<u8>) -> bool {
        if !self.is_control(id) || !self.is_attached(id) {
            return false;
        }
        let Some(image) = self.find_image(id) else {
            return false;
        };
        if let NodeKind::Image(data) = &mut self.node_mut(image).kind {
            data.bytes = bytes;
        }
        true
    }

    /// Bytes of the first image in the control subtree.
    pub fn image_bytes(&self, id: NodeId) -> Option<&[u8]> {
        let image = self.find_image(id)?;
        match &self.node(image).kind {
            NodeKind::Image(data) => Some(&data.bytes),
            _ => None,
        }
    }

    fn find_image(&self, id: NodeId) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if matches!(self.node(current).kind, NodeKind::Image(_)) {
                return Some(current);
            }
            for &child in self.node(current).children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    /// Splices the children of the control's content region into the
    /// control's place and detaches the wrapper. Returns false for handles
    /// that are not attached controls under a parent.
    pub fn unwrap_control(&mut self, id: NodeId) -> bool {
        if !self.is_control(id) || !self.is_attached(id) {
            return false;
        }
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(position) = self.node(parent).children.iter().position(|&c| c == id) else {
            return false;
        };
        let freed: Vec<NodeId> = match self.control_content(id) {
            Some(content) => std::mem::take(&mut self.node_mut(content).children),
            None => Vec::new(),
        };
        self.detach(id);
        for (offset, child) in freed.iter().enumerate() {
            self.node_mut(*child).parent = Some(parent);
            self.node_mut(parent).children.insert(position + offset, *child);
        }
        true
    }

    /// Unwraps every control left in the document, outermost first, and
    /// returns how many were unwrapped.
    pub fn unwrap_all_controls(&mut self) -> usize {
        let mut unwrapped = 0;
        // inner controls surface as the outer wrappers disappear, so keep
        // sweeping until a pass finds nothing
        loop {
            let round: Vec<NodeId> = self.controls();
            if round.is_empty() {
                return unwrapped;
            }
            for id in round {
                if self.unwrap_control(id) {
                    unwrapped += 1;
                }
            }
        }
    }

    /// The visible text of the whole document, line breaks rendered as `\n`.
    pub fn rendered_text(&self) -> String {
        self.text_of(self.root)
    }

    /// The visible text of one control.
    pub fn control_text(&self, id: NodeId) -> String {
        self.text_of(id)
    }

    fn text_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.node(current).kind {
                NodeKind::Text(leaf) => out.push_str(&leaf.value),
                NodeKind::LineBreak => out.push('\n'),
                _ => {}
            }
            for &child in self.node(current).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    fn text_leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if matches!(self.node(current).kind, NodeKind::Text(_)) {
                found.push(current);
            }
            for &child in self.node(current).children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    pub(crate) fn add_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.node_mut(id).parent = Some(parent);
        self.node_mut(parent).children.push(id);
        id
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
        self.node_mut(id).parent = None;
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Normalizes every line ending style to `\n` and splits.
fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace("\n\r", "\n")
        .split('\n')
        .map(str::to_string)
        .collect()
}
