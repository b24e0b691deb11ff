//! Constraint-driven layout walk.
//!
//! Sizes flow top-down as [`Constraint`]s; every node resolves its own size,
//! hands its children tighter constraints through its strategy, and ends the
//! pass with a valid [`ComputedLayout`].

use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::errors::Warnings;
use crate::flex;
use crate::layout::{ComputedLayout, Position};
use crate::math::{Constraint, Dimensions};
use crate::node::{ComponentKind, Node, NodeId, NodeState, Tree};
use crate::strategy::{Frame, StrategyRegistry};
use crate::text::{self, MeasureTextFn, DEFAULT_FONT_SIZE};

// ============================================================================
// Constants
// ============================================================================

pub(crate) const HEADING_SIZES: [f32; 6] = [32.0, 24.0, 20.0, 18.0, 16.0, 14.0];
pub(crate) const CONTROL_FONT_SIZE: f32 = 14.0;
const SMALL_SCALE: f32 = 0.85;
const EMPTY_TEXT_WIDTH: f32 = 50.0;

const BUTTON_FALLBACK_WIDTH: f32 = 80.0;
const BUTTON_EXTRA_WIDTH: f32 = 20.0;
const BUTTON_EXTRA_HEIGHT: f32 = 12.0;

const INPUT_WIDTH: f32 = 200.0;
const INPUT_HEIGHT: f32 = 30.0;

pub(crate) const CHECKBOX_INSET: f32 = 5.0;
pub(crate) const CHECKBOX_BOX: f32 = 20.0;
pub(crate) const CHECKBOX_LABEL_GAP: f32 = 15.0;
const CHECKBOX_HEIGHT: f32 = 24.0;

const DROPDOWN_ARROW_SPACE: f32 = 40.0;
const DROPDOWN_MIN_WIDTH: f32 = 120.0;
const DROPDOWN_EXTRA_HEIGHT: f32 = 16.0;

pub(crate) const PLACEHOLDER_WIDTH: f32 = 100.0;
pub(crate) const PLACEHOLDER_HEIGHT: f32 = 50.0;
const RULE_HEIGHT: f32 = 16.0;

pub(crate) const EPSILON: f32 = 0.01;

// ============================================================================
// Helper functions
// ============================================================================

pub(crate) fn float_equal(left: f32, right: f32) -> bool {
    let diff = left - right;
    diff < EPSILON && diff > -EPSILON
}

pub(crate) fn heading_size(level: u8) -> f32 {
    HEADING_SIZES[(level.clamp(1, 6) - 1) as usize]
}

/// Font size a node is measured and painted with.
pub(crate) fn font_size(node: &Node) -> f32 {
    let default = match (node.kind, &node.state) {
        (ComponentKind::Heading, NodeState::Heading { level }) => heading_size(*level),
        (ComponentKind::Button | ComponentKind::Tab, _) => CONTROL_FONT_SIZE,
        _ => DEFAULT_FONT_SIZE,
    };
    let size = node.style.font.size_or(default);
    if node.kind == ComponentKind::Small {
        size * SMALL_SCALE
    } else {
        size
    }
}

fn cache_key(constraint: &Constraint) -> [u32; 4] {
    [
        constraint.min_width.to_bits(),
        constraint.max_width.to_bits(),
        constraint.min_height.to_bits(),
        constraint.max_height.to_bits(),
    ]
}

// ============================================================================
// LayoutCx
// ============================================================================

/// State of one layout pass. Strategies receive it to measure and lay out
/// children.
pub struct LayoutCx<'a> {
    tree: &'a mut Tree,
    registry: &'a StrategyRegistry,
    measure_text_fn: Option<&'a MeasureTextFn>,
    config: &'a Config,
    intrinsic_cache: FxHashMap<(NodeId, [u32; 4]), Dimensions>,
    warnings: Warnings,
}

impl<'a> LayoutCx<'a> {
    pub(crate) fn new(
        tree: &'a mut Tree,
        registry: &'a StrategyRegistry,
        measure_text_fn: Option<&'a MeasureTextFn>,
        config: &'a Config,
    ) -> Self {
        Self {
            tree,
            registry,
            measure_text_fn,
            config,
            intrinsic_cache: FxHashMap::default(),
            warnings: Warnings::default(),
        }
    }

    /// Lays out `root` and everything below it. The root sits at its anchor
    /// when absolute, at the origin otherwise.
    pub(crate) fn run(&mut self, root: NodeId, constraint: Constraint) -> Dimensions {
        for id in self.tree.descendants(root) {
            self.tree[id].layout.valid = false;
        }
        let size = self.layout_node(root, constraint);
        let (x, y) = match self.tree[root].style.position {
            Position::Absolute { x, y } => (x, y),
            Position::Flow => (0.0, 0.0),
        };
        self.set_position(root, x, y);
        size
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.tree[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.tree[id]
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Visible children that take part in their parent's flow.
    pub fn flow_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree[id]
            .children
            .iter()
            .copied()
            .filter(|&child| {
                let node = &self.tree[child];
                node.style.visible && !node.style.is_absolute() && node.kind != ComponentKind::Modal
            })
            .collect()
    }

    pub fn measure_text(
        &mut self,
        text: &str,
        font_size: f32,
        line_height: f32,
        max_width: f32,
    ) -> Dimensions {
        if self.measure_text_fn.is_none() && !self.warnings.text_measurement_fn_not_set {
            self.warnings.text_measurement_fn_not_set = true;
            tracing::debug!("text measurement function not set, estimating from character count");
        }
        text::measure(self.measure_text_fn, text, font_size, line_height, max_width)
    }

    /// The size `id` wants under `constraint`: explicit sizes win, `Auto`
    /// follows content, and the style's min/max applies last. Cached per pass.
    pub fn intrinsic_size(&mut self, id: NodeId, constraint: Constraint) -> Dimensions {
        let node = &self.tree[id];
        if !node.style.visible || node.kind == ComponentKind::Modal {
            return Dimensions::zero();
        }
        let key = (id, cache_key(&constraint));
        if let Some(size) = self.intrinsic_cache.get(&key) {
            return *size;
        }

        let strategy = self.registry.resolve(node.kind);
        let content = (strategy.measure)(self, id, constraint);

        let style = &self.tree[id].style;
        let width = style.width.resolve(constraint.max_width).unwrap_or(content.width);
        let height = style.height.resolve(constraint.max_height).unwrap_or(content.height);
        let size = style.clamp(Dimensions::new(width, height));

        self.intrinsic_cache.insert(key, size);
        size
    }

    /// Resolves the size of `id` under `constraint`, arranges its children
    /// and marks its layout valid. The parent sets the position afterwards.
    pub fn layout_node(&mut self, id: NodeId, constraint: Constraint) -> Dimensions {
        let node = &self.tree[id];
        if !node.style.visible {
            self.hide_subtree(id);
            return Dimensions::zero();
        }
        let kind = node.kind;
        let width_decl = node.style.width.resolve(constraint.max_width);
        let height_decl = node.style.height.resolve(constraint.max_height);
        let strategy = self.registry.resolve(kind);

        let width = match width_decl {
            Some(width) => width,
            None if constraint.has_bounded_width() => constraint.max_width,
            None => self.intrinsic_size(id, constraint).width,
        };
        let width = self.tree[id].style.clamp_width(constraint.clamp_width(width));

        let height = match height_decl {
            Some(height) => height,
            None => {
                let bounded = Constraint::new(
                    0.0,
                    width,
                    constraint.min_height,
                    constraint.max_height,
                );
                self.intrinsic_size(id, bounded).height
            }
        };
        let height = self.tree[id].style.clamp_height(constraint.clamp_height(height));

        let frame = Frame {
            size: Dimensions::new(width, height),
            constraint,
            auto_width: width_decl.is_none(),
            auto_height: height_decl.is_none(),
        };
        let arranged = (strategy.arrange)(self, id, frame);
        let size = if kind == ComponentKind::Modal {
            arranged
        } else {
            self.tree[id].style.clamp(constraint.clamp(arranged))
        };

        self.layout_out_of_flow(id, size);

        let layout = &mut self.tree[id].layout;
        layout.width = size.width;
        layout.height = size.height;
        layout.valid = true;
        if self.config.trace_layout {
            tracing::trace!(
                node = self.tree[id].id,
                kind = ?kind,
                strategy = strategy.name,
                width = size.width,
                height = size.height,
                "resolved size"
            );
        }
        size
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        let layout = &mut self.tree[id].layout;
        layout.x = x;
        layout.y = y;
        if self.config.trace_layout {
            tracing::trace!(node = self.tree[id].id, x, y, "positioned");
        }
    }

    /// Bounded ancestor search. Running past `max_ancestor_depth` is logged
    /// once per pass and reads as "not found".
    pub(crate) fn find_ancestor(
        &mut self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        match self.tree.find_ancestor(id, self.config.max_ancestor_depth, pred) {
            Ok(found) => found,
            Err(e) => {
                if !self.warnings.ancestor_depth_exceeded {
                    self.warnings.ancestor_depth_exceeded = true;
                    tracing::warn!("{}", e);
                }
                None
            }
        }
    }

    /// Writes a layout computed elsewhere (the table pass) and marks it valid.
    pub(crate) fn store_layout(&mut self, id: NodeId, x: f32, y: f32, size: Dimensions) {
        self.tree[id].layout = ComputedLayout {
            x,
            y,
            width: size.width,
            height: size.height,
            valid: true,
        };
    }

    /// Gives `id` and its descendants a zero, valid layout.
    pub fn hide_subtree(&mut self, id: NodeId) {
        for node in self.tree.descendants(id) {
            self.tree[node].layout = ComputedLayout {
                valid: true,
                ..Default::default()
            };
        }
    }

    /// Hidden, absolute and modal children. Absolute children are sized
    /// against the content box and placed at their anchor; modals sit at the
    /// origin and lay out their own box.
    pub(crate) fn layout_out_of_flow(&mut self, id: NodeId, size: Dimensions) {
        let padding = self.tree[id].style.padding;
        let content = Constraint::loose(
            (size.width - padding.horizontal_total()).max(0.0),
            (size.height - padding.vertical_total()).max(0.0),
        );
        let children = self.tree[id].children.clone();
        for child in children {
            let node = &self.tree[child];
            if !node.style.visible {
                self.hide_subtree(child);
                continue;
            }
            match node.style.position {
                Position::Absolute { x, y } => {
                    let wanted = content.clamp(self.intrinsic_size(child, content));
                    self.layout_node(child, Constraint::tight(wanted.width, wanted.height));
                    self.set_position(child, x, y);
                }
                Position::Flow if node.kind == ComponentKind::Modal => {
                    self.layout_node(child, content);
                    self.set_position(child, 0.0, 0.0);
                }
                Position::Flow => {}
            }
        }
    }
}

// ============================================================================
// Leaf strategies
// ============================================================================

pub(crate) fn measure_text_leaf(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let node = cx.node(id);
    let font = font_size(node);
    let line_height = node.style.font.line_height_or_default();
    let padding = node.style.padding;
    let text = node.text.clone().unwrap_or_default();

    if text.is_empty() {
        return Dimensions::new(
            EMPTY_TEXT_WIDTH + padding.horizontal_total(),
            font * line_height + padding.vertical_total(),
        );
    }
    let max_width = (constraint.max_width - padding.horizontal_total()).max(0.0);
    let measured = cx.measure_text(&text, font, line_height, max_width);
    Dimensions::new(
        measured.width + padding.horizontal_total(),
        measured.height + padding.vertical_total(),
    )
}

/// Markdown blocks hold either their own text or inline children.
pub(crate) fn measure_text_block(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    if cx.flow_children(id).is_empty() {
        measure_text_leaf(cx, id, constraint)
    } else {
        flex::measure(cx, id, constraint)
    }
}

pub(crate) fn arrange_text_block(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    if cx.flow_children(id).is_empty() {
        arrange_leaf(cx, id, frame)
    } else {
        flex::arrange(cx, id, frame)
    }
}

pub(crate) fn measure_button(cx: &mut LayoutCx<'_>, id: NodeId, _: Constraint) -> Dimensions {
    let node = cx.node(id);
    let font = font_size(node);
    let line_height = node.style.font.line_height_or_default();
    let padding = node.style.padding;
    let label = node.text.clone().unwrap_or_default();

    let width = if label.is_empty() {
        BUTTON_FALLBACK_WIDTH
    } else {
        cx.measure_text(&label, font, line_height, f32::INFINITY).width
            + padding.horizontal_total()
            + BUTTON_EXTRA_WIDTH
    };
    Dimensions::new(width, font + padding.vertical_total() + BUTTON_EXTRA_HEIGHT)
}

pub(crate) fn measure_input(_: &mut LayoutCx<'_>, _: NodeId, _: Constraint) -> Dimensions {
    Dimensions::new(INPUT_WIDTH, INPUT_HEIGHT)
}

pub(crate) fn measure_checkbox(cx: &mut LayoutCx<'_>, id: NodeId, _: Constraint) -> Dimensions {
    let node = cx.node(id);
    let font = font_size(node);
    let line_height = node.style.font.line_height_or_default();
    let label = node.text.clone().unwrap_or_default();

    let label_width = if label.is_empty() {
        0.0
    } else {
        cx.measure_text(&label, font, line_height, f32::INFINITY).width
    };
    Dimensions::new(
        CHECKBOX_INSET + CHECKBOX_BOX + CHECKBOX_LABEL_GAP + label_width,
        CHECKBOX_HEIGHT,
    )
}

pub(crate) fn measure_dropdown(cx: &mut LayoutCx<'_>, id: NodeId, _: Constraint) -> Dimensions {
    let node = cx.node(id);
    let font = font_size(node);
    let line_height = node.style.font.line_height_or_default();
    let mut labels: Vec<String> = Vec::new();
    if let Some(state) = node.dropdown_state() {
        labels.extend(state.options.iter().cloned());
        labels.extend(state.placeholder.iter().cloned());
    }

    let widest = labels
        .iter()
        .map(|label| cx.measure_text(label, font, line_height, f32::INFINITY).width)
        .fold(0.0, f32::max);
    Dimensions::new(
        (widest + DROPDOWN_ARROW_SPACE).max(DROPDOWN_MIN_WIDTH),
        font + DROPDOWN_EXTRA_HEIGHT,
    )
}

pub(crate) fn measure_image(_: &mut LayoutCx<'_>, _: NodeId, _: Constraint) -> Dimensions {
    Dimensions::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
}

pub(crate) fn measure_rule(_: &mut LayoutCx<'_>, _: NodeId, constraint: Constraint) -> Dimensions {
    let width = if constraint.has_bounded_width() {
        constraint.max_width
    } else {
        0.0
    };
    Dimensions::new(width, RULE_HEIGHT)
}

/// Padding only.
pub(crate) fn measure_empty(cx: &mut LayoutCx<'_>, id: NodeId, _: Constraint) -> Dimensions {
    let padding = cx.node(id).style.padding;
    Dimensions::new(padding.horizontal_total(), padding.vertical_total())
}

/// Containers arrange like flex, custom leaves take the placeholder size.
pub(crate) fn measure_fallback(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    if !cx.flow_children(id).is_empty() {
        return flex::measure(cx, id, constraint);
    }
    match cx.node(id).kind {
        ComponentKind::Custom(_) => Dimensions::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT),
        _ => measure_empty(cx, id, constraint),
    }
}

pub(crate) fn arrange_fallback(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    if cx.flow_children(id).is_empty() {
        arrange_leaf(cx, id, frame)
    } else {
        flex::arrange(cx, id, frame)
    }
}

/// Keeps the resolved size. Stray flow children get their intrinsic size at
/// the padding origin.
pub(crate) fn arrange_leaf(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let padding = cx.node(id).style.padding;
    let content = Constraint::loose(
        (frame.size.width - padding.horizontal_total()).max(0.0),
        (frame.size.height - padding.vertical_total()).max(0.0),
    );
    for child in cx.flow_children(id) {
        let wanted = content.clamp(cx.intrinsic_size(child, content));
        cx.layout_node(child, Constraint::tight(wanted.width, wanted.height));
        cx.set_position(child, padding.left, padding.top);
    }
    frame.size
}
