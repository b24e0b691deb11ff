//! Flex arrangement and the containers built on it: center, modal and tabs.

use crate::align::{Align, Justify};
use crate::engine::{self, LayoutCx, EPSILON};
use crate::layout::{LayoutDirection, Spacing};
use crate::math::{Constraint, Dimensions};
use crate::node::{ComponentKind, Node, NodeId, NodeState};
use crate::strategy::Frame;

// ============================================================================
// Constants
// ============================================================================

pub(crate) const MODAL_DEFAULT_WIDTH: f32 = 400.0;
pub(crate) const MODAL_DEFAULT_HEIGHT: f32 = 300.0;
pub(crate) const MODAL_TITLE_BAR_HEIGHT: f32 = 40.0;
const MODAL_DEFAULT_PADDING: f32 = 24.0;

const TAB_GROUP_FALLBACK_WIDTH: f32 = 400.0;
const TAB_GROUP_FALLBACK_HEIGHT: f32 = 300.0;
const TAB_BAR_HEIGHT: f32 = 44.0;
const TAB_HEIGHT: f32 = 36.0;
const TAB_FALLBACK_WIDTH: f32 = 80.0;
const TAB_CHAR_WIDTH_RATIO: f32 = 0.55;
const TAB_EXTRA_WIDTH: f32 = 24.0;

// ============================================================================
// Axis helpers
// ============================================================================

fn main_of(size: Dimensions, direction: LayoutDirection) -> f32 {
    match direction {
        LayoutDirection::LeftToRight => size.width,
        LayoutDirection::TopToBottom => size.height,
    }
}

fn cross_of(size: Dimensions, direction: LayoutDirection) -> f32 {
    match direction {
        LayoutDirection::LeftToRight => size.height,
        LayoutDirection::TopToBottom => size.width,
    }
}

fn compose(main: f32, cross: f32, direction: LayoutDirection) -> Dimensions {
    match direction {
        LayoutDirection::LeftToRight => Dimensions::new(main, cross),
        LayoutDirection::TopToBottom => Dimensions::new(cross, main),
    }
}

/// `(main_start, main_end, cross_start, cross_end)`
fn sides(spacing: Spacing, direction: LayoutDirection) -> (f32, f32, f32, f32) {
    match direction {
        LayoutDirection::LeftToRight => (spacing.left, spacing.right, spacing.top, spacing.bottom),
        LayoutDirection::TopToBottom => (spacing.top, spacing.bottom, spacing.left, spacing.right),
    }
}

fn tight(size: Dimensions) -> Constraint {
    Constraint::tight(size.width, size.height)
}

fn loose(size: Dimensions) -> Constraint {
    Constraint::loose(size.width, size.height)
}

// ============================================================================
// Flex
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct FlexParams {
    direction: LayoutDirection,
    justify: Justify,
    align: Align,
    gap: f32,
    padding: Spacing,
    /// Tab content children grow to fill whatever the group has left.
    content_grows: bool,
}

impl FlexParams {
    fn of(node: &Node) -> Self {
        let direction = match node.kind {
            ComponentKind::Row => LayoutDirection::LeftToRight,
            ComponentKind::Column => LayoutDirection::TopToBottom,
            _ => node.style.direction,
        };
        Self {
            direction,
            justify: node.style.justify,
            align: node.style.align,
            gap: node.style.gap,
            padding: node.style.padding,
            content_grows: false,
        }
    }

    fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }
}

struct Item {
    id: NodeId,
    base: f32,
    cross: f32,
    margin: (f32, f32, f32, f32),
    grow: f32,
    shrink: f32,
    min_main: f32,
    max_main: f32,
    cross_auto: bool,
}

impl Item {
    fn main_margins(&self) -> f32 {
        self.margin.0 + self.margin.1
    }

    fn cross_margins(&self) -> f32 {
        self.margin.2 + self.margin.3
    }
}

fn measure_with(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint, params: FlexParams) -> Dimensions {
    let dir = params.direction;
    let padding = params.padding;
    let inner = constraint.deflate(padding.horizontal_total(), padding.vertical_total());
    let child_constraint = Constraint::loose(inner.max_width, inner.max_height);
    let children = cx.flow_children(id);

    let mut main = 0.0f32;
    let mut cross = 0.0f32;
    for &child in &children {
        let size = cx.intrinsic_size(child, child_constraint);
        let (ms, me, cs, ce) = sides(cx.node(child).style.margin, dir);
        main += main_of(size, dir) + ms + me;
        cross = cross.max(cross_of(size, dir) + cs + ce);
    }
    if children.len() > 1 {
        main += params.gap * (children.len() - 1) as f32;
    }

    let padding_size = Dimensions::new(padding.horizontal_total(), padding.vertical_total());
    compose(
        main + main_of(padding_size, dir),
        cross + cross_of(padding_size, dir),
        dir,
    )
}

fn arrange_with(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame, params: FlexParams) -> Dimensions {
    let dir = params.direction;
    let padding = params.padding;
    let padding_size = Dimensions::new(padding.horizontal_total(), padding.vertical_total());
    let (pad_main, pad_cross) = (main_of(padding_size, dir), cross_of(padding_size, dir));
    let (pad_main_start, _, pad_cross_start, _) = sides(padding, dir);

    let proposed_inner = Dimensions::new(
        (frame.size.width - padding_size.width).max(0.0),
        (frame.size.height - padding_size.height).max(0.0),
    );
    let measure_constraint = loose(proposed_inner);

    // Unconstrained sizes.
    let children = cx.flow_children(id);
    let mut items = Vec::with_capacity(children.len());
    for &child in &children {
        let size = cx.intrinsic_size(child, measure_constraint);
        let node = cx.node(child);
        let style = &node.style;
        let (cross_decl, min_main, max_main) = match dir {
            LayoutDirection::LeftToRight => (style.height, style.min_width, style.max_width),
            LayoutDirection::TopToBottom => (style.width, style.min_height, style.max_height),
        };
        let grow = if params.content_grows && node.kind == ComponentKind::TabContent {
            style.grow.max(1.0)
        } else {
            style.grow
        };
        items.push(Item {
            id: child,
            base: main_of(size, dir),
            cross: cross_of(size, dir),
            margin: sides(style.margin, dir),
            grow,
            shrink: style.shrink,
            min_main: min_main.unwrap_or(0.0),
            max_main: max_main.unwrap_or(f32::INFINITY),
            cross_auto: cross_decl.is_auto(),
        });
    }

    let count = items.len();
    let gaps = if count > 1 {
        params.gap * (count - 1) as f32
    } else {
        0.0
    };
    let total: f32 = items.iter().map(|i| i.base + i.main_margins()).sum::<f32>() + gaps;
    let any_grow = items.iter().any(|i| i.grow > 0.0);

    // Main size of the container itself.
    let (main_auto, cross_auto) = match dir {
        LayoutDirection::LeftToRight => (frame.auto_width, frame.auto_height),
        LayoutDirection::TopToBottom => (frame.auto_height, frame.auto_width),
    };
    let c = frame.constraint;
    let (min_main, max_main) = match dir {
        LayoutDirection::LeftToRight => (c.min_width, c.max_width),
        LayoutDirection::TopToBottom => (c.min_height, c.max_height),
    };
    let content_main = total + pad_main;
    let main_size = if !main_auto {
        main_of(frame.size, dir)
    } else if params.justify == Justify::Start && !any_grow {
        content_main.max(min_main)
    } else if max_main.is_finite() {
        max_main
    } else {
        content_main
    };
    let main_size = clamp_main(cx.node(id), c, main_size, dir);
    let inner_main = (main_size - pad_main).max(0.0);

    // Grow or shrink.
    let leftover = inner_main - total;
    let mut mains: Vec<f32> = items.iter().map(|i| i.base).collect();
    if leftover > EPSILON && any_grow {
        resolve_flexible(&items, &mut mains, leftover, |i| i.grow);
    } else if leftover < -EPSILON {
        resolve_flexible(&items, &mut mains, leftover, |i| i.shrink * i.base);
    }

    // Cross size of the container.
    let widest = items
        .iter()
        .map(|i| i.cross + i.cross_margins())
        .fold(0.0, f32::max);
    let cross_size = if cross_auto {
        cross_of(frame.size, dir).max(widest + pad_cross)
    } else {
        cross_of(frame.size, dir)
    };
    let cross_size = clamp_cross(cx.node(id), c, cross_size, dir);
    let inner_cross = (cross_size - pad_cross).max(0.0);

    // Lay out children with tight constraints.
    let mut sizes = Vec::with_capacity(count);
    for (item, &main) in items.iter().zip(&mains) {
        let available = (inner_cross - item.cross_margins()).max(0.0);
        let cross = if params.align == Align::Stretch && item.cross_auto {
            available
        } else {
            item.cross.min(available)
        };
        sizes.push(cx.layout_node(item.id, tight(compose(main, cross, dir))));
    }

    // Positions.
    let used: f32 = items
        .iter()
        .zip(&sizes)
        .map(|(i, s)| main_of(*s, dir) + i.main_margins())
        .sum::<f32>()
        + gaps;
    let (leading, extra) = params.justify.spacing(inner_main - used, count);
    let mut cursor = pad_main_start + leading;
    for (item, size) in items.iter().zip(&sizes) {
        let (ms, me, cs, _) = item.margin;
        let available = (inner_cross - item.cross_margins()).max(0.0);
        let main_pos = cursor + ms;
        let cross_pos = pad_cross_start + cs + params.align.offset(available, cross_of(*size, dir));
        let (x, y) = match dir {
            LayoutDirection::LeftToRight => (main_pos, cross_pos),
            LayoutDirection::TopToBottom => (cross_pos, main_pos),
        };
        cx.set_position(item.id, x, y);
        cursor = main_pos + main_of(*size, dir) + me + params.gap + extra;
    }

    compose(main_size, cross_size, dir)
}

/// Shares `amount` (positive grows, negative shrinks) by `weight`. Items that
/// reach their max (or min) are frozen there and what they could not take is
/// shared again among the rest.
fn resolve_flexible(items: &[Item], mains: &mut [f32], mut amount: f32, weight: impl Fn(&Item) -> f32) {
    let growing = amount > 0.0;
    let mut frozen: Vec<bool> = items.iter().map(|i| weight(i) <= 0.0).collect();
    while amount.abs() > EPSILON {
        let weight_sum: f32 = items
            .iter()
            .zip(&frozen)
            .filter(|(_, f)| !**f)
            .map(|(i, _)| weight(i))
            .sum();
        if weight_sum <= 0.0 {
            break;
        }
        let mut spent = 0.0;
        let mut froze_any = false;
        for (index, item) in items.iter().enumerate() {
            if frozen[index] {
                continue;
            }
            let target = mains[index] + amount * weight(item) / weight_sum;
            let limited = if growing {
                target.min(item.max_main.max(item.min_main))
            } else {
                target.max(item.min_main)
            };
            if limited != target {
                frozen[index] = true;
                froze_any = true;
            }
            spent += limited - mains[index];
            mains[index] = limited;
        }
        amount -= spent;
        if !froze_any {
            break;
        }
    }
}

fn clamp_main(node: &Node, c: Constraint, value: f32, dir: LayoutDirection) -> f32 {
    match dir {
        LayoutDirection::LeftToRight => node.style.clamp_width(c.clamp_width(value)),
        LayoutDirection::TopToBottom => node.style.clamp_height(c.clamp_height(value)),
    }
}

fn clamp_cross(node: &Node, c: Constraint, value: f32, dir: LayoutDirection) -> f32 {
    match dir {
        LayoutDirection::LeftToRight => node.style.clamp_height(c.clamp_height(value)),
        LayoutDirection::TopToBottom => node.style.clamp_width(c.clamp_width(value)),
    }
}

pub(crate) fn measure(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let params = FlexParams::of(cx.node(id));
    measure_with(cx, id, constraint, params)
}

pub(crate) fn arrange(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let params = FlexParams::of(cx.node(id));
    arrange_with(cx, id, frame, params)
}

pub(crate) fn measure_column(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let params = FlexParams::of(cx.node(id)).direction(LayoutDirection::TopToBottom);
    measure_with(cx, id, constraint, params)
}

pub(crate) fn arrange_column(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let params = FlexParams::of(cx.node(id)).direction(LayoutDirection::TopToBottom);
    arrange_with(cx, id, frame, params)
}

// ============================================================================
// Center
// ============================================================================

pub(crate) fn measure_center(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let padding = cx.node(id).style.padding;
    let inner = constraint.deflate(padding.horizontal_total(), padding.vertical_total());
    let child = match cx.flow_children(id).first() {
        Some(&child) => cx.intrinsic_size(child, Constraint::loose(inner.max_width, inner.max_height)),
        None => Dimensions::zero(),
    };
    Dimensions::new(
        child.width + padding.horizontal_total(),
        child.height + padding.vertical_total(),
    )
}

/// Fills the constraint and centers the first visible child on both axes.
pub(crate) fn arrange_center(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let c = frame.constraint;
    let width = if frame.auto_width && c.has_bounded_width() {
        c.max_width
    } else {
        frame.size.width
    };
    let height = if frame.auto_height && c.has_bounded_height() {
        c.max_height
    } else {
        frame.size.height
    };
    let padding = cx.node(id).style.padding;
    let inner = Dimensions::new(
        (width - padding.horizontal_total()).max(0.0),
        (height - padding.vertical_total()).max(0.0),
    );

    let children = cx.flow_children(id);
    if let Some((&first, rest)) = children.split_first() {
        let wanted = loose(inner).clamp(cx.intrinsic_size(first, loose(inner)));
        let size = cx.layout_node(first, tight(wanted));
        cx.set_position(
            first,
            padding.left + (inner.width - size.width) / 2.0,
            padding.top + (inner.height - size.height) / 2.0,
        );
        for &other in rest {
            cx.hide_subtree(other);
        }
    }
    Dimensions::new(width, height)
}

// ============================================================================
// Modal
// ============================================================================

pub(crate) fn measure_modal(_: &mut LayoutCx<'_>, _: NodeId, _: Constraint) -> Dimensions {
    Dimensions::zero()
}

/// Sizes the modal box and stacks the children inside it, relative to the
/// box origin. The modal itself takes no room in flow.
pub(crate) fn arrange_modal(cx: &mut LayoutCx<'_>, id: NodeId, _: Frame) -> Dimensions {
    let node = cx.node(id);
    let box_size = Dimensions::new(
        node.style.width.px().unwrap_or(MODAL_DEFAULT_WIDTH),
        node.style.height.px().unwrap_or(MODAL_DEFAULT_HEIGHT),
    );
    let has_title = node
        .modal_state()
        .is_some_and(|state| state.title.as_deref().is_some_and(|t| !t.is_empty()));
    let pad = |value: f32| if value > 0.0 { value } else { MODAL_DEFAULT_PADDING };
    let padding = Spacing::new(
        pad(node.style.padding.left),
        pad(node.style.padding.right),
        pad(node.style.padding.top),
        pad(node.style.padding.bottom),
    );
    let gap = node.style.gap;

    let top = if has_title { MODAL_TITLE_BAR_HEIGHT } else { 0.0 } + padding.top;
    let content_width = (box_size.width - padding.horizontal_total()).max(0.0);
    let mut y = top;
    for child in cx.flow_children(id) {
        let size = cx.layout_node(child, Constraint::new(0.0, content_width, 0.0, f32::INFINITY));
        cx.set_position(child, padding.left, y);
        y += size.height + gap;
    }

    if let NodeState::Modal(state) = &mut cx.node_mut(id).state {
        state.box_size = box_size;
    }
    Dimensions::zero()
}

// ============================================================================
// Tabs
// ============================================================================

pub(crate) fn measure_tab_group(_: &mut LayoutCx<'_>, _: NodeId, constraint: Constraint) -> Dimensions {
    let width = if constraint.has_bounded_width() {
        constraint.max_width
    } else {
        TAB_GROUP_FALLBACK_WIDTH
    };
    let height = if constraint.has_bounded_height() {
        constraint.max_height
    } else {
        TAB_GROUP_FALLBACK_HEIGHT
    };
    Dimensions::new(width, height)
}

/// Bar on top, content filling the rest.
pub(crate) fn arrange_tab_group(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let mut params = FlexParams::of(cx.node(id)).direction(LayoutDirection::TopToBottom);
    params.align = Align::Stretch;
    params.justify = Justify::Start;
    params.content_grows = true;
    let frame = Frame {
        auto_width: false,
        auto_height: false,
        ..frame
    };
    arrange_with(cx, id, frame, params)
}

pub(crate) fn measure_tab_bar(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let params = FlexParams::of(cx.node(id)).direction(LayoutDirection::LeftToRight);
    let content = measure_with(cx, id, constraint, params);
    Dimensions::new(content.width, TAB_BAR_HEIGHT)
}

pub(crate) fn arrange_tab_bar(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let params = FlexParams::of(cx.node(id)).direction(LayoutDirection::LeftToRight);
    let frame = Frame {
        auto_width: false,
        ..frame
    };
    arrange_with(cx, id, frame, params)
}

pub(crate) fn measure_tab(cx: &mut LayoutCx<'_>, id: NodeId, _: Constraint) -> Dimensions {
    let node = cx.node(id);
    let width = match node.text.as_deref() {
        Some(title) if !title.is_empty() => {
            title.chars().count() as f32 * engine::font_size(node) * TAB_CHAR_WIDTH_RATIO
                + node.style.padding.horizontal_total()
                + TAB_EXTRA_WIDTH
        }
        _ => TAB_FALLBACK_WIDTH,
    };
    Dimensions::new(width, TAB_HEIGHT)
}

pub(crate) fn measure_tab_content(cx: &mut LayoutCx<'_>, id: NodeId, constraint: Constraint) -> Dimensions {
    let padding = cx.node(id).style.padding;
    let inner = constraint.deflate(padding.horizontal_total(), padding.vertical_total());
    let selected = selected_tab(cx, id);
    let panel = match cx.flow_children(id).get(selected) {
        Some(&panel) => cx.intrinsic_size(panel, Constraint::loose(inner.max_width, inner.max_height)),
        None => Dimensions::zero(),
    };
    Dimensions::new(
        panel.width + padding.horizontal_total(),
        panel.height + padding.vertical_total(),
    )
}

/// Only the selected panel is laid out; the others collapse to nothing.
pub(crate) fn arrange_tab_content(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let padding = cx.node(id).style.padding;
    let inner = Dimensions::new(
        (frame.size.width - padding.horizontal_total()).max(0.0),
        (frame.size.height - padding.vertical_total()).max(0.0),
    );
    let selected = selected_tab(cx, id);
    for (index, panel) in cx.flow_children(id).into_iter().enumerate() {
        if index == selected {
            cx.layout_node(panel, tight(inner));
            cx.set_position(panel, padding.left, padding.top);
        } else {
            cx.hide_subtree(panel);
        }
    }
    frame.size
}

fn selected_tab(cx: &mut LayoutCx<'_>, id: NodeId) -> usize {
    let group = cx.find_ancestor(id, |n| n.kind == ComponentKind::TabGroup);
    match group.map(|g| &cx.node(g).state) {
        Some(NodeState::TabGroup(state)) => state.selected,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::float_equal;
    use crate::node::{ModalState, TabGroupState, Tree};
    use crate::strategy::StrategyRegistry;

    fn run(tree: &mut Tree, root: NodeId, constraint: Constraint) {
        let registry = StrategyRegistry::default();
        let config = Config::default();
        LayoutCx::new(tree, &registry, None, &config).run(root, constraint);
    }

    fn boxed(tree: &mut Tree, parent: NodeId, width: f32, height: f32) -> NodeId {
        let id = tree.add_child(parent, ComponentKind::Container);
        tree[id].style.size(width, height);
        id
    }

    #[test]
    fn auto_row_hugs_children() {
        let mut tree = Tree::new();
        let row = tree.add_root(ComponentKind::Row);
        tree[row].style.gap(10.0).padding(5.0);
        boxed(&mut tree, row, 30.0, 20.0);
        boxed(&mut tree, row, 40.0, 10.0);
        run(&mut tree, row, Constraint::loose(800.0, 600.0));

        let layout = tree[row].layout();
        assert_eq!(layout.width, 30.0 + 40.0 + 10.0 + 10.0);
        assert_eq!(layout.height, 30.0);
    }

    #[test]
    fn grow_fills_container_exactly() {
        let mut tree = Tree::new();
        let row = tree.add_root(ComponentKind::Row);
        tree[row].style.width(crate::fixed!(300.0)).gap(12.0);
        let a = boxed(&mut tree, row, 50.0, 10.0);
        let b = tree.add_child(row, ComponentKind::Container);
        let c = tree.add_child(row, ComponentKind::Container);
        tree[b].style.grow(1.0);
        tree[c].style.grow(3.0);
        run(&mut tree, row, Constraint::loose(800.0, 600.0));

        let widths: f32 = [a, b, c].iter().map(|&id| tree[id].layout().width).sum();
        assert!(float_equal(widths + 24.0, 300.0));
        assert!(float_equal(tree[c].layout().width, 3.0 * tree[b].layout().width));
        assert!(float_equal(tree[c].layout().x, 300.0 - tree[c].layout().width));
    }

    #[test]
    fn grow_passes_what_a_capped_child_cannot_take_to_the_others() {
        let mut tree = Tree::new();
        let row = tree.add_root(ComponentKind::Row);
        tree[row].style.width(crate::fixed!(300.0));
        let capped = tree.add_child(row, ComponentKind::Container);
        let open = tree.add_child(row, ComponentKind::Container);
        tree[capped].style.grow(1.0).max_width(50.0);
        tree[open].style.grow(1.0);
        run(&mut tree, row, Constraint::loose(800.0, 600.0));

        assert_eq!(tree[capped].layout().width, 50.0);
        assert!(float_equal(tree[open].layout().width, 250.0));
        assert!(float_equal(tree[open].layout().x, 50.0));
    }

    #[test]
    fn shrink_is_weighted_by_base_and_floored() {
        let mut tree = Tree::new();
        let row = tree.add_root(ComponentKind::Row);
        tree[row].style.width(crate::fixed!(100.0));
        let a = tree.add_child(row, ComponentKind::Text);
        let b = tree.add_child(row, ComponentKind::Text);
        tree[a].text("aaaaaaaaaa").style.shrink(1.0);
        tree[b].text("bbbbb").style.shrink(1.0).min_width(38.0);
        run(&mut tree, row, Constraint::loose(800.0, 600.0));
        // 80 + 40 into 100: b would lose 1/3 of 20 but floors at 38, and a
        // takes the rest of the cut.
        assert!(float_equal(tree[a].layout().width, 62.0));
        assert_eq!(tree[b].layout().width, 38.0);
    }

    #[test]
    fn space_between_single_child_sits_at_start() {
        let mut tree = Tree::new();
        let row = tree.add_root(ComponentKind::Row);
        tree[row].style.width(crate::fixed!(200.0)).justify(Justify::SpaceBetween).padding(4.0);
        let only = boxed(&mut tree, row, 20.0, 20.0);
        run(&mut tree, row, Constraint::loose(800.0, 600.0));
        assert_eq!(tree[only].layout().x, 4.0);
    }

    #[test]
    fn justify_center_and_align_end() {
        let mut tree = Tree::new();
        let col = tree.add_root(ComponentKind::Column);
        tree[col]
            .style
            .size(100.0, 100.0)
            .justify(Justify::Center)
            .align(Align::End);
        let child = boxed(&mut tree, col, 20.0, 40.0);
        run(&mut tree, col, Constraint::loose(800.0, 600.0));
        let layout = tree[child].layout();
        assert_eq!((layout.x, layout.y), (80.0, 30.0));
    }

    #[test]
    fn stretch_fills_cross_axis_minus_margins() {
        let mut tree = Tree::new();
        let col = tree.add_root(ComponentKind::Column);
        tree[col].style.width(crate::fixed!(120.0)).align(Align::Stretch);
        let child = tree.add_child(col, ComponentKind::Container);
        tree[child].style.height(crate::fixed!(10.0)).margin(Spacing::horizontal(10.0));
        run(&mut tree, col, Constraint::loose(800.0, 600.0));
        let layout = tree[child].layout();
        assert_eq!((layout.x, layout.width), (10.0, 100.0));
    }

    #[test]
    fn flow_siblings_do_not_overlap() {
        let mut tree = Tree::new();
        let col = tree.add_root(ComponentKind::Column);
        let a = tree.add_child(col, ComponentKind::Text);
        let b = tree.add_child(col, ComponentKind::Button);
        tree[a].text("first");
        tree[b].text("second");
        run(&mut tree, col, Constraint::loose(400.0, 400.0));
        let (la, lb) = (*tree[a].layout(), *tree[b].layout());
        assert!(la.y + la.height <= lb.y);
    }

    #[test]
    fn center_places_child_in_the_middle() {
        let mut tree = Tree::new();
        let center = tree.add_root(ComponentKind::Center);
        let child = boxed(&mut tree, center, 40.0, 20.0);
        run(&mut tree, center, Constraint::loose(200.0, 100.0));
        assert_eq!(tree[center].layout().bounds().dimensions(), Dimensions::new(200.0, 100.0));
        let layout = tree[child].layout();
        assert_eq!((layout.x, layout.y), (80.0, 40.0));
    }

    #[test]
    fn modal_takes_no_room_and_stores_its_box() {
        let mut tree = Tree::new();
        let col = tree.add_root(ComponentKind::Column);
        let modal = tree.add_child(col, ComponentKind::Modal);
        let after = boxed(&mut tree, col, 10.0, 10.0);
        tree[modal].state(NodeState::Modal(ModalState {
            open: true,
            title: Some("Settings".into()),
            ..Default::default()
        }));
        let body = tree.add_child(modal, ComponentKind::Text);
        tree[body].text("hi");
        run(&mut tree, col, Constraint::loose(800.0, 600.0));

        assert_eq!(tree[after].layout().y, 0.0);
        assert_eq!(tree[modal].layout().width, 0.0);
        assert_eq!(
            tree[modal].modal_state().map(|s| s.box_size),
            Some(Dimensions::new(400.0, 300.0))
        );
        let layout = tree[body].layout();
        assert_eq!((layout.x, layout.y), (24.0, 64.0));
    }

    #[test]
    fn tab_content_lays_out_selected_panel_only() {
        let mut tree = Tree::new();
        let group = tree.add_root(ComponentKind::TabGroup);
        tree[group].state(NodeState::TabGroup(TabGroupState {
            selected: 1,
            active_color: None,
        }));
        let bar = tree.add_child(group, ComponentKind::TabBar);
        let first_tab = tree.add_child(bar, ComponentKind::Tab);
        tree[first_tab].text("One");
        let content = tree.add_child(group, ComponentKind::TabContent);
        let p0 = tree.add_child(content, ComponentKind::TabPanel);
        let p1 = tree.add_child(content, ComponentKind::TabPanel);
        run(&mut tree, group, Constraint::loose(500.0, 400.0));

        assert_eq!(tree[group].layout().bounds().dimensions(), Dimensions::new(500.0, 400.0));
        assert_eq!(tree[bar].layout().height, 44.0);
        let content_layout = *tree[content].layout();
        assert_eq!((content_layout.y, content_layout.height), (44.0, 356.0));
        assert_eq!(tree[p0].layout().width, 0.0);
        assert!(tree[p0].layout().valid);
        assert_eq!(tree[p1].layout().bounds().dimensions(), Dimensions::new(500.0, 356.0));
        // 3 chars * 14 * 0.55 + 24
        assert!(float_equal(tree[first_tab].layout().width, 47.1));
    }
}
