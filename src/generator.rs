//! Paint pass: walks a laid-out tree and appends render commands.
//!
//! Generation runs twice over the tree: the main pass paints everything in
//! document order and sets aside overlays (open modals, open dropdowns, tab
//! groups); the overlay pass then paints those from their recorded handles.

use rustc_hash::FxHashMap;

use crate::color::Color;
use crate::config::Config;
use crate::debug;
use crate::emitters::{self, CellPaint, CustomPainter, EmitCx, Painter};
use crate::errors::{Error, Warnings};
use crate::expr::Evaluator;
use crate::layout::ComputedLayout;
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::node::{ComponentKind, Node, NodeId, NodeState, Tree};
use crate::render_commands::{CommandBuffer, Pass, RenderCommand, RenderCommandConfig};
use crate::table::TableStyle;
use crate::text::MeasureTextFn;

// ============================================================================
// Opacity
// ============================================================================

/// Nested opacity, multiplied down the tree.
///
/// Pushes past `max_depth` are counted but not applied; their pops are
/// silent so the emitted `SetOpacity`/`PopOpacity` pairs stay balanced.
#[derive(Debug)]
pub(crate) struct OpacityStack {
    saved: Vec<f32>,
    current: f32,
    overflow: usize,
    max_depth: usize,
}

impl OpacityStack {
    pub(crate) fn new(initial: f32, max_depth: usize) -> Self {
        Self {
            saved: Vec::with_capacity(max_depth),
            current: unit_opacity(initial),
            overflow: 0,
            max_depth,
        }
    }

    pub(crate) fn current(&self) -> f32 {
        self.current
    }

    /// Returns the new effective opacity, or `None` when the push was dropped.
    pub(crate) fn push(&mut self, opacity: f32, warnings: &mut Warnings) -> Option<f32> {
        if self.saved.len() >= self.max_depth {
            if !warnings.opacity_depth_exceeded {
                tracing::warn!(max_depth = self.max_depth, "opacity stack depth exceeded");
                warnings.opacity_depth_exceeded = true;
            }
            self.overflow += 1;
            return None;
        }
        self.saved.push(self.current);
        self.current *= unit_opacity(opacity);
        Some(self.current)
    }

    /// Returns whether a `PopOpacity` should be emitted.
    pub(crate) fn pop(&mut self, warnings: &mut Warnings) -> bool {
        if self.overflow > 0 {
            self.overflow -= 1;
            return false;
        }
        match self.saved.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => {
                if !warnings.opacity_underflow {
                    tracing::warn!("opacity stack underflow");
                    warnings.opacity_underflow = true;
                }
                false
            }
        }
    }

    /// Starts over from `base` with nothing pushed.
    fn rebase(&mut self, base: f32) {
        self.saved.clear();
        self.overflow = 0;
        self.current = base;
    }
}

/// Clamps to `0.0..=1.0`; NaN and infinities read as fully opaque.
fn unit_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

// ============================================================================
// Generator
// ============================================================================

/// A node set aside for the overlay pass.
#[derive(Debug, Clone, Copy)]
struct OverlayHandle {
    node: NodeId,
    /// Absolute origin of the parent's box.
    origin: Vector2,
    /// Opacity in effect when the node was reached.
    opacity: f32,
}

/// Where a table's sections, rows and cells get painted from.
#[derive(Debug, Clone, Copy)]
struct TableWalk {
    origin: Vector2,
    style: TableStyle,
}

pub(crate) struct Generator<'a> {
    tree: &'a mut Tree,
    buffer: &'a mut CommandBuffer,
    config: &'a Config,
    measure_text_fn: Option<&'a MeasureTextFn>,
    evaluator: Option<&'a dyn Evaluator>,
    painters: &'a FxHashMap<u32, Box<dyn CustomPainter>>,
    opacity: OpacityStack,
    initial_opacity: f32,
    pass: Pass,
    /// Node painted inline because the overlay list was full.
    inline_overlay: Option<NodeId>,
    root: NodeId,
    viewport: Dimensions,
    overlays: Vec<OverlayHandle>,
    failed: Vec<NodeId>,
    warnings: Warnings,
}

impl<'a> Generator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tree: &'a mut Tree,
        buffer: &'a mut CommandBuffer,
        config: &'a Config,
        measure_text_fn: Option<&'a MeasureTextFn>,
        evaluator: Option<&'a dyn Evaluator>,
        painters: &'a FxHashMap<u32, Box<dyn CustomPainter>>,
        root: NodeId,
        initial_opacity: f32,
    ) -> Self {
        let opacity = OpacityStack::new(initial_opacity, config.max_opacity_depth);
        Self {
            initial_opacity: opacity.current(),
            opacity,
            tree,
            buffer,
            config,
            measure_text_fn,
            evaluator,
            painters,
            pass: Pass::Main,
            inline_overlay: None,
            root,
            viewport: config.viewport_fallback,
            overlays: Vec::new(),
            failed: Vec::new(),
            warnings: Warnings::default(),
        }
    }

    /// Both passes over the subtree at the root.
    pub(crate) fn run(mut self) -> Result<(), Error> {
        let root = self.root;
        self.tree.clear_rendered(root);
        let layout = self.tree[root].layout;
        if layout.valid && layout.width > 0.0 && layout.height > 0.0 {
            self.viewport = Dimensions::new(layout.width, layout.height);
        }

        self.marker(RenderCommandConfig::BeginPass(Pass::Main));
        self.paint(root, Vector2::default(), None);
        self.marker(RenderCommandConfig::EndPass(Pass::Main));

        if !self.overlays.is_empty() {
            self.pass = Pass::Overlay;
            self.marker(RenderCommandConfig::BeginPass(Pass::Overlay));
            let overlays = std::mem::take(&mut self.overlays);
            for handle in overlays {
                self.opacity.rebase(handle.opacity);
                self.paint(handle.node, handle.origin, None);
            }
            self.opacity.rebase(self.initial_opacity);
            self.marker(RenderCommandConfig::EndPass(Pass::Overlay));
        }

        if self.failed.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = self.failed.len(), "paint refused for nodes without a resolved layout");
            Err(Error::LayoutNotResolved { nodes: self.failed })
        }
    }

    fn marker(&mut self, config: RenderCommandConfig) {
        self.buffer.push(RenderCommand::new(0, BoundingBox::default(), config));
    }

    // ------------------------------------------------------------------------
    // Per-node walk
    // ------------------------------------------------------------------------

    /// Layout to paint with, or `None` when the node is skipped or refused.
    fn paintable(&mut self, id: NodeId) -> Option<ComputedLayout> {
        let node = &self.tree[id];
        if !node.style.visible {
            return None;
        }
        if node.kind == ComponentKind::Modal && !node.is_open() {
            return None;
        }
        if let Some(condition) = &node.visible_when {
            if !condition.allows(self.evaluator, node.scope) {
                return None;
            }
        }
        if !node.layout.valid {
            self.failed.push(id);
            return None;
        }
        Some(node.layout)
    }

    fn defers(&self, node: &Node) -> bool {
        match node.kind {
            ComponentKind::Modal | ComponentKind::Dropdown => node.is_open(),
            ComponentKind::TabGroup | ComponentKind::TabBar => true,
            _ => false,
        }
    }

    /// Paints `id`, whose parent box starts at `origin`. `drag_x` replaces the
    /// node's x while it is being dragged.
    fn paint(&mut self, id: NodeId, origin: Vector2, drag_x: Option<f32>) {
        let Some(layout) = self.paintable(id) else {
            return;
        };
        let node = &self.tree[id];
        let (x, y) = if node.style.is_absolute() {
            (layout.x, layout.y)
        } else {
            (origin.x + layout.x, origin.y + layout.y)
        };
        let bounds = BoundingBox::new(drag_x.unwrap_or(x), y, layout.width, layout.height);
        let own = if node.kind == ComponentKind::Modal {
            self.modal_box(node)
        } else {
            bounds
        };
        let painted = node.style.transform.apply(own);

        let mut inline = false;
        if self.pass == Pass::Main && self.defers(node) {
            if self.overlays.len() < self.config.max_overlays {
                self.overlays.push(OverlayHandle {
                    node: id,
                    origin,
                    opacity: self.opacity.current(),
                });
                return;
            }
            if !self.warnings.max_overlays_exceeded {
                tracing::warn!(max_overlays = self.config.max_overlays, "overlay limit reached, painting inline");
                self.warnings.max_overlays_exceeded = true;
            }
            inline = true;
        }
        self.tree[id].rendered = Some(painted);

        let pushed = self.push_opacity(id);
        self.inline_overlay = inline.then_some(id);
        self.emit_node(id, painted);
        self.inline_overlay = None;
        let children_origin = if self.tree[id].kind == ComponentKind::Modal {
            own
        } else {
            bounds
        };
        self.paint_children(id, children_origin);
        self.pop_opacity(pushed);
    }

    fn push_opacity(&mut self, id: NodeId) -> bool {
        let opacity = self.tree[id].style.opacity;
        if !opacity.is_finite() || opacity >= 1.0 {
            return false;
        }
        if let Some(effective) = self.opacity.push(opacity, &mut self.warnings) {
            let node_id = self.tree[id].id;
            self.buffer.push(RenderCommand::new(
                node_id,
                BoundingBox::default(),
                RenderCommandConfig::SetOpacity(effective),
            ));
        }
        true
    }

    fn pop_opacity(&mut self, pushed: bool) {
        if pushed && self.opacity.pop(&mut self.warnings) {
            self.marker(RenderCommandConfig::PopOpacity);
        }
    }

    /// The node's own paint: wireframe, or the emitter for its kind.
    fn emit_node(&mut self, id: NodeId, bounds: BoundingBox) {
        match self.tree[id].kind {
            ComponentKind::Tab => {
                let active = self.active_tab_color(id);
                self.with_painter(id, bounds, |p, cx, node| emitters::tab(p, cx, node, bounds, active));
            }
            ComponentKind::Modal => {
                let viewport = self.viewport;
                self.with_painter(id, bounds, |p, cx, node| emitters::modal(p, cx, node, bounds, viewport));
            }
            ComponentKind::Custom(kind) => {
                let painters = self.painters;
                match painters.get(&kind) {
                    Some(painter) if !self.wireframed(id) => {
                        let opacity = self.opacity.current();
                        painter.paint(&self.tree[id], bounds, opacity, self.buffer);
                    }
                    _ => self.with_painter(id, bounds, |p, _, node| {
                        emitters::custom_fallback(p, node, bounds, kind)
                    }),
                }
            }
            _ => {
                let skip_background = id == self.root && self.config.skip_root_background;
                self.with_painter(id, bounds, |p, cx, node| {
                    emitters::emit(p, cx, node, bounds, skip_background)
                });
            }
        }
    }

    fn wireframed(&self, id: NodeId) -> bool {
        let wireframe = &self.config.wireframe;
        wireframe.enabled && wireframe.filter.matches(&self.tree[id])
    }

    /// Runs `emit` with a painter for `id`, unless the wireframe takes over.
    fn with_painter(
        &mut self,
        id: NodeId,
        bounds: BoundingBox,
        emit: impl FnOnce(&mut Painter<'_>, &EmitCx<'_>, &Node),
    ) {
        let node = &self.tree[id];
        let cx = EmitCx {
            measure_text_fn: self.measure_text_fn,
            evaluator: self.evaluator,
            overlay_content: self.pass == Pass::Overlay || self.inline_overlay == Some(id),
            hovered: self.tree.hovered() == Some(id),
        };
        let mut painter = Painter::new(self.buffer, node.id, self.opacity.current());
        if self.config.wireframe.enabled && self.config.wireframe.filter.matches(node) {
            debug::wireframe(&mut painter, node, bounds, &self.config.wireframe);
        } else {
            emit(&mut painter, &cx, node);
        }
    }

    // ------------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------------

    fn paint_children(&mut self, id: NodeId, parent: BoundingBox) {
        let origin = Vector2::new(parent.x, parent.y);
        let node = &self.tree[id];
        if node.kind == ComponentKind::Table {
            let style = node.table_state().map(|s| s.style).unwrap_or_default();
            self.paint_table(id, TableWalk { origin, style });
            return;
        }

        let mut children: Vec<NodeId> = if node.kind == ComponentKind::TabContent {
            let selected = self.selected_tab(id);
            let node = &self.tree[id];
            node.children
                .iter()
                .copied()
                .filter(|&c| {
                    let child = &self.tree[c];
                    child.style.visible && !child.style.is_absolute() && child.kind != ComponentKind::Modal
                })
                .nth(selected)
                .into_iter()
                .collect()
        } else {
            node.children
                .iter()
                .copied()
                .filter(|&c| self.tree[c].style.visible)
                .collect()
        };

        if !children.is_empty() && children.iter().all(|&c| self.tree[c].style.is_absolute()) {
            children.sort_by_key(|&c| self.tree[c].style.z_index);
        }

        let node = &self.tree[id];
        let dragged = node.drag.and_then(|d| node.children.get(d.index).map(|&c| (c, d.pointer_x)));
        for child in children {
            if dragged.is_some_and(|(c, _)| c == child) {
                continue;
            }
            self.paint(child, origin, None);
        }
        if let Some((child, pointer_x)) = dragged {
            let width = self.tree[child].layout.width;
            self.paint(child, origin, Some(pointer_x - width / 2.0));
        }
    }

    /// Sections, rows and cells from the geometry cached by table layout.
    fn paint_table(&mut self, table: NodeId, walk: TableWalk) {
        let mut body_row = 0usize;
        let children = self.tree[table].children.clone();
        for child in children {
            let kind = self.tree[child].kind;
            if kind.is_table_section() || kind == ComponentKind::TableRow {
                self.paint_table_part(child, walk, kind == ComponentKind::TableHead, &mut body_row);
            }
        }
    }

    fn paint_table_part(&mut self, id: NodeId, walk: TableWalk, header: bool, body_row: &mut usize) {
        let Some(layout) = self.paintable(id) else {
            return;
        };
        let local = BoundingBox::new(layout.x, layout.y, layout.width, layout.height);
        let bounds = local.offset(walk.origin.x, walk.origin.y);
        let transform = self.tree[id].style.transform;
        let painted = transform.apply(bounds);
        self.tree[id].rendered = Some(transform.apply(local));

        let kind = self.tree[id].kind;
        let pushed = self.push_opacity(id);
        if kind.is_table_cell() {
            let padding = self.cell_padding(id);
            let cell = CellPaint {
                padding,
                header: header || kind == ComponentKind::TableHeaderCell,
                style: walk.style,
            };
            self.with_painter(id, painted, |p, cx, node| emitters::cell(p, cx, node, painted, cell));
            self.paint_children(id, bounds);
        } else if kind == ComponentKind::TableRow {
            let stripe = if header {
                None
            } else {
                let index = *body_row;
                *body_row += 1;
                walk.style.striped_rows.then(|| {
                    if index % 2 == 0 {
                        walk.style.even_row_background
                    } else {
                        walk.style.odd_row_background
                    }
                })
            };
            self.with_painter(id, painted, |p, _, node| emitters::row(p, node, painted, stripe));
            let origin = Vector2::new(bounds.x, bounds.y);
            let children = self.tree[id].children.clone();
            for child in children {
                let node = &self.tree[child];
                if node.kind.is_table_cell() {
                    self.paint_table_part(child, walk, header, body_row);
                } else if node.style.is_absolute() || node.kind == ComponentKind::Modal {
                    self.paint(child, origin, None);
                }
            }
        } else {
            self.with_painter(id, painted, |p, _, node| emitters::container(p, &node.style, painted));
            let rows = self.tree[id].children.clone();
            for row in rows {
                if self.tree[row].kind == ComponentKind::TableRow {
                    self.paint_table_part(row, walk, header, body_row);
                }
            }
        }
        self.pop_opacity(pushed);
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    fn modal_box(&self, node: &Node) -> BoundingBox {
        let size = match &node.state {
            NodeState::Modal(state) => state.box_size,
            _ => Dimensions::default(),
        };
        BoundingBox::new(
            (self.viewport.width - size.width) / 2.0,
            (self.viewport.height - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    fn ancestor(&mut self, id: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        match self.tree.find_ancestor(id, self.config.max_ancestor_depth, pred) {
            Ok(found) => found,
            Err(e) => {
                if !self.warnings.ancestor_depth_exceeded {
                    tracing::warn!("{}", e);
                    self.warnings.ancestor_depth_exceeded = true;
                }
                None
            }
        }
    }

    fn cell_padding(&mut self, cell: NodeId) -> f32 {
        self.ancestor(cell, |n| n.kind == ComponentKind::Table)
            .and_then(|table| self.tree[table].table_state().map(|s| s.style.cell_padding))
            .unwrap_or(TableStyle::default().cell_padding)
    }

    fn selected_tab(&mut self, id: NodeId) -> usize {
        let group = self.ancestor(id, |n| n.kind == ComponentKind::TabGroup);
        match group.map(|g| &self.tree[g].state) {
            Some(NodeState::TabGroup(state)) => state.selected,
            _ => 0,
        }
    }

    /// The group's active color when `tab` is the selected one.
    fn active_tab_color(&mut self, tab: NodeId) -> Option<Color> {
        let group = self.ancestor(tab, |n| n.kind == ComponentKind::TabGroup)?;
        let NodeState::TabGroup(state) = &self.tree[group].state else {
            return None;
        };
        let (selected, color) = (state.selected, state.active_color?);
        let bar = self.tree[tab].parent()?;
        let index = self.tree[bar]
            .children
            .iter()
            .filter(|&&c| self.tree[c].kind == ComponentKind::Tab && self.tree[c].style.visible)
            .position(|&c| c == tab)?;
        (index == selected).then_some(color)
    }
}
