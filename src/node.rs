//! Arena-allocated component tree.
//!
//! Nodes live in one `Vec` and are addressed by [`NodeId`]. A parent owns its
//! children through the index list; the child's `parent` index is only used for
//! ancestor lookups.

use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::elements::Style;
use crate::errors::Error;
use crate::expr::Condition;
use crate::layout::ComputedLayout;
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::table::{CellSpan, TableState};

/// Handle to a node inside a [`Tree`]. Only valid for the tree that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Every kind of component the pipeline knows how to size and paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentKind {
    Container,
    Row,
    Column,
    Center,
    Text,
    Strong,
    Em,
    Small,
    Mark,
    CodeInline,
    Button,
    Input,
    Checkbox,
    Dropdown,
    Image,
    Markdown,
    Heading,
    Paragraph,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    List,
    ListItem,
    Link,
    Modal,
    TabGroup,
    TabBar,
    Tab,
    TabContent,
    TabPanel,
    Table,
    TableHead,
    TableBody,
    TableFoot,
    TableRow,
    TableCell,
    TableHeaderCell,
    /// Host-defined component painted by a registered custom painter.
    Custom(u32),
}

impl ComponentKind {
    /// Text leaves, including the inline variants.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ComponentKind::Text
                | ComponentKind::Strong
                | ComponentKind::Em
                | ComponentKind::Small
                | ComponentKind::Mark
                | ComponentKind::CodeInline
        )
    }

    pub fn is_markdown(self) -> bool {
        matches!(
            self,
            ComponentKind::Markdown
                | ComponentKind::Heading
                | ComponentKind::Paragraph
                | ComponentKind::Blockquote
                | ComponentKind::CodeBlock
                | ComponentKind::HorizontalRule
                | ComponentKind::List
                | ComponentKind::ListItem
                | ComponentKind::Link
        )
    }

    pub fn is_table_section(self) -> bool {
        matches!(
            self,
            ComponentKind::TableHead | ComponentKind::TableBody | ComponentKind::TableFoot
        )
    }

    pub fn is_table_cell(self) -> bool {
        matches!(self, ComponentKind::TableCell | ComponentKind::TableHeaderCell)
    }

    /// Sections, rows and cells: their geometry is owned by the table pass.
    pub fn is_table_internal(self) -> bool {
        self.is_table_section() || self == ComponentKind::TableRow || self.is_table_cell()
    }
}

/// A child being dragged inside its parent; painted last, following the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Drag {
    /// Index into the parent's children.
    pub index: usize,
    pub pointer_x: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DropdownState {
    pub open: bool,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
    pub placeholder: Option<String>,
}

impl DropdownState {
    pub fn selected_text(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModalState {
    pub open: bool,
    pub title: Option<String>,
    /// Box size resolved by the last layout pass.
    pub(crate) box_size: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputState {
    pub value: String,
    pub placeholder: Option<String>,
    /// Caret position in characters.
    pub cursor: usize,
    pub scroll_x: f32,
    pub focused: bool,
    /// Blink phase, driven by the host.
    pub caret_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TabGroupState {
    pub selected: usize,
    /// Background of the selected tab; unset keeps the tab's own background.
    pub active_color: Option<Color>,
}

/// Per-kind data attached to a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeState {
    #[default]
    None,
    Table(TableState),
    Cell(CellSpan),
    TabGroup(TabGroupState),
    Dropdown(DropdownState),
    Modal(ModalState),
    Checkbox { checked: bool },
    Input(InputState),
    Image { source: Option<String> },
    Heading { level: u8 },
}

/// One component in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Caller-facing id, copied into every command the node emits.
    pub id: u32,
    pub kind: ComponentKind,
    pub style: Style,
    pub text: Option<String>,
    /// Reactive text, evaluated at paint time; `text` is the fallback.
    pub text_expression: Option<String>,
    pub visible_when: Option<Condition>,
    /// Scope handed to the evaluator for this node's expressions.
    pub scope: u32,
    pub state: NodeState,
    pub drag: Option<Drag>,
    pub disabled: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layout: ComputedLayout,
    pub(crate) rendered: Option<BoundingBox>,
}

impl Node {
    fn new(id: u32, kind: ComponentKind, parent: Option<NodeId>) -> Self {
        Self {
            id,
            kind,
            style: Style::default(),
            text: None,
            text_expression: None,
            visible_when: None,
            scope: 0,
            state: default_state(kind),
            drag: None,
            disabled: false,
            parent,
            children: Vec::new(),
            layout: ComputedLayout::default(),
            rendered: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    /// Bounds recorded by the last paint, for hit-testing.
    pub fn rendered_bounds(&self) -> Option<BoundingBox> {
        self.rendered
    }

    #[inline]
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    #[inline]
    pub fn text_expression(&mut self, expression: impl Into<String>) -> &mut Self {
        self.text_expression = Some(expression.into());
        self
    }

    #[inline]
    pub fn visible_when(&mut self, condition: Condition) -> &mut Self {
        self.visible_when = Some(condition);
        self
    }

    #[inline]
    pub fn scope(&mut self, scope: u32) -> &mut Self {
        self.scope = scope;
        self
    }

    #[inline]
    pub fn state(&mut self, state: NodeState) -> &mut Self {
        self.state = state;
        self
    }

    #[inline]
    pub fn drag(&mut self, drag: Option<Drag>) -> &mut Self {
        self.drag = drag;
        self
    }

    #[inline]
    pub fn disabled(&mut self, disabled: bool) -> &mut Self {
        self.disabled = disabled;
        self
    }

    pub fn table_state(&self) -> Option<&TableState> {
        match &self.state {
            NodeState::Table(state) => Some(state),
            _ => None,
        }
    }

    pub fn dropdown_state(&self) -> Option<&DropdownState> {
        match &self.state {
            NodeState::Dropdown(state) => Some(state),
            _ => None,
        }
    }

    pub fn modal_state(&self) -> Option<&ModalState> {
        match &self.state {
            NodeState::Modal(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn cell_span(&self) -> CellSpan {
        match &self.state {
            NodeState::Cell(span) => span.normalized(),
            _ => CellSpan::default(),
        }
    }

    /// True for open modals and open dropdowns.
    pub(crate) fn is_open(&self) -> bool {
        match &self.state {
            NodeState::Modal(state) => state.open,
            NodeState::Dropdown(state) => state.open,
            _ => false,
        }
    }
}

fn default_state(kind: ComponentKind) -> NodeState {
    match kind {
        ComponentKind::Table => NodeState::Table(TableState::default()),
        ComponentKind::TableCell | ComponentKind::TableHeaderCell => {
            NodeState::Cell(CellSpan::default())
        }
        ComponentKind::TabGroup => NodeState::TabGroup(TabGroupState::default()),
        ComponentKind::Dropdown => NodeState::Dropdown(DropdownState::default()),
        ComponentKind::Modal => NodeState::Modal(ModalState::default()),
        ComponentKind::Checkbox => NodeState::Checkbox { checked: false },
        ComponentKind::Input => NodeState::Input(InputState::default()),
        ComponentKind::Image => NodeState::Image { source: None },
        ComponentKind::Heading => NodeState::Heading { level: 1 },
        _ => NodeState::None,
    }
}

/// Owns every node of one component tree.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    hovered: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node with no parent.
    pub fn add_root(&mut self, kind: ComponentKind) -> NodeId {
        self.push_node(kind, None)
    }

    /// Appends a node as the last child of `parent`.
    ///
    /// # Panics
    /// When `parent` was minted by another tree and is out of range.
    pub fn add_child(&mut self, parent: NodeId, kind: ComponentKind) -> NodeId {
        let id = self.push_node(kind, Some(parent));
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn push_node(&mut self, kind: ComponentKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id.0, kind, parent));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn set_hovered(&mut self, hovered: Option<NodeId>) {
        self.hovered = hovered;
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Bounds recorded for `id` by the last paint.
    pub fn rendered_bounds(&self, id: NodeId) -> Option<BoundingBox> {
        self.get(id).and_then(|n| n.rendered)
    }

    /// Pre-order list of `root` and everything below it.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        out
    }

    /// Walks parents looking for a node matching `pred`, giving up after
    /// `max_depth` steps.
    pub fn find_ancestor(
        &self,
        id: NodeId,
        max_depth: usize,
        pred: impl Fn(&Node) -> bool,
    ) -> Result<Option<NodeId>, Error> {
        let mut current = self[id].parent;
        let mut depth = 0;
        while let Some(ancestor) = current {
            if depth >= max_depth {
                return Err(Error::AncestorDepthExceeded {
                    node: id,
                    max_depth,
                });
            }
            if pred(&self[ancestor]) {
                return Ok(Some(ancestor));
            }
            current = self[ancestor].parent;
            depth += 1;
        }
        Ok(None)
    }

    /// The deepest painted node under `point`, in window coordinates.
    ///
    /// Table sections, rows and cells record table-relative bounds; they are
    /// moved by their table's painted origin here. A table part whose table
    /// is more than `max_ancestor_depth` levels up is skipped.
    pub fn node_at(&self, point: Vector2, max_ancestor_depth: usize) -> Option<NodeId> {
        let mut best: Option<(usize, NodeId)> = None;
        for id in self.ids() {
            let node = &self[id];
            let Some(mut bounds) = node.rendered else {
                continue;
            };
            if node.kind.is_table_internal() {
                let table = self
                    .find_ancestor(id, max_ancestor_depth, |n| n.kind == ComponentKind::Table)
                    .ok()
                    .flatten()
                    .and_then(|t| self[t].rendered);
                match table {
                    Some(t) => bounds = bounds.offset(t.x, t.y),
                    None => continue,
                }
            }
            if !bounds.contains(point) {
                continue;
            }
            let depth = self.depth(id);
            if best.map_or(true, |(d, _)| depth >= d) {
                best = Some((depth, id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self[id].parent;
        while let Some(p) = current {
            depth += 1;
            current = self[p].parent;
        }
        depth
    }

    pub(crate) fn clear_rendered(&mut self, root: NodeId) {
        for id in self.descendants(root) {
            self.nodes[id.index()].rendered = None;
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order_and_parent_index() {
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let a = tree.add_child(root, ComponentKind::Text);
        let b = tree.add_child(root, ComponentKind::Button);
        assert_eq!(tree[root].children(), &[a, b]);
        assert_eq!(tree[b].parent(), Some(root));
        assert_eq!(tree.descendants(root), vec![root, a, b]);
    }

    #[test]
    fn kinds_get_their_state_blob() {
        let mut tree = Tree::new();
        let table = tree.add_root(ComponentKind::Table);
        let dd = tree.add_child(table, ComponentKind::Dropdown);
        assert!(tree[table].table_state().is_some());
        assert!(tree[dd].dropdown_state().is_some());
        assert!(!tree[dd].is_open());
    }

    #[test]
    fn ancestor_search_is_bounded() {
        let mut tree = Tree::new();
        let table = tree.add_root(ComponentKind::Table);
        let body = tree.add_child(table, ComponentKind::TableBody);
        let row = tree.add_child(body, ComponentKind::TableRow);
        let cell = tree.add_child(row, ComponentKind::TableCell);

        let found = tree.find_ancestor(cell, 100, |n| n.kind == ComponentKind::Table);
        assert_eq!(found, Ok(Some(table)));

        let too_deep = tree.find_ancestor(cell, 1, |n| n.kind == ComponentKind::Table);
        assert!(matches!(too_deep, Err(Error::AncestorDepthExceeded { max_depth: 1, .. })));

        let missing = tree.find_ancestor(cell, 100, |n| n.kind == ComponentKind::Modal);
        assert_eq!(missing, Ok(None));
    }

    #[test]
    fn node_at_prefers_deepest() {
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Container);
        let child = tree.add_child(root, ComponentKind::Button);
        tree[root].rendered = Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        tree[child].rendered = Some(BoundingBox::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(tree.node_at(Vector2::new(15.0, 15.0), 100), Some(child));
        assert_eq!(tree.node_at(Vector2::new(50.0, 50.0), 100), Some(root));
        assert_eq!(tree.node_at(Vector2::new(150.0, 50.0), 100), None);
    }

    #[test]
    fn node_at_bounds_the_table_lookup() {
        let mut tree = Tree::new();
        let table = tree.add_root(ComponentKind::Table);
        let body = tree.add_child(table, ComponentKind::TableBody);
        let row = tree.add_child(body, ComponentKind::TableRow);
        let cell = tree.add_child(row, ComponentKind::TableCell);
        tree[table].rendered = Some(BoundingBox::new(50.0, 50.0, 100.0, 100.0));
        tree[cell].rendered = Some(BoundingBox::new(1.0, 1.0, 20.0, 20.0));

        let point = Vector2::new(55.0, 55.0);
        assert_eq!(tree.node_at(point, 3), Some(cell));
        // The table sits three levels above the cell; a cap of two falls back
        // to the table itself.
        assert_eq!(tree.node_at(point, 2), Some(table));
    }
}
