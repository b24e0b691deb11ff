//! Layout and paint pipeline for declarative UI trees.
//!
//! A [`Tree`] of component nodes goes through two steps:
//!
//! 1. [`Pipeline::layout`] resolves parent-relative geometry for every node
//!    with per-kind strategies, flex arrangement and table grid sizing.
//! 2. [`Pipeline::generate_commands`] walks the laid-out tree and appends
//!    renderer-agnostic [`RenderCommand`]s to a [`CommandBuffer`], with
//!    overlays painted in a second pass.

pub mod align;
pub mod color;
pub mod config;
mod debug;
pub mod elements;
pub mod emitters;
pub mod engine;
pub mod errors;
pub mod expr;
mod flex;
mod generator;
pub mod layout;
pub mod math;
pub mod node;
pub mod prelude;
pub mod render_commands;
pub mod strategy;
pub mod table;
pub mod text;

use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use color::Color;
pub use config::{Config, WireframeConfig, WireframeFilter};
pub use emitters::CustomPainter;
pub use errors::Error;
pub use expr::{Condition, Evaluator};
pub use math::{BoundingBox, Constraint, Dimensions, Vector2};
pub use node::{ComponentKind, Node, NodeId, NodeState, Tree};
pub use render_commands::{CommandBuffer, Pass, RenderCommand, RenderCommandConfig};
pub use strategy::{RegistryBuilder, Strategy, StrategyRegistry};

use engine::LayoutCx;
use generator::Generator;
use text::MeasureTextFn;

/// Owns the collaborators of both passes. One pipeline can serve any number of
/// trees, one pass at a time per tree.
pub struct Pipeline {
    config: Config,
    registry: Arc<StrategyRegistry>,
    measure_text_fn: Option<MeasureTextFn>,
    evaluator: Option<Box<dyn Evaluator>>,
    painters: FxHashMap<u32, Box<dyn CustomPainter>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("strategies", &self.registry.len())
            .field("measure_text_fn", &self.measure_text_fn.is_some())
            .field("evaluator", &self.evaluator.is_some())
            .field("painters", &self.painters.len())
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Pipeline {
    /// Uses the built-in strategies.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, StrategyRegistry::shared())
    }

    pub fn with_registry(config: Config, registry: Arc<StrategyRegistry>) -> Self {
        Self {
            config,
            registry,
            measure_text_fn: None,
            evaluator: None,
            painters: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    /// Installs the text measurer: `(text, font_size, max_width) -> size`.
    /// Without one, text is sized from its character count.
    pub fn set_measure_text_function<F>(&mut self, f: F)
    where
        F: Fn(&str, f32, f32) -> Dimensions + Send + Sync + 'static,
    {
        self.measure_text_fn = Some(Box::new(f));
    }

    pub fn set_evaluator(&mut self, evaluator: impl Evaluator + 'static) {
        self.evaluator = Some(Box::new(evaluator));
    }

    /// Paints nodes of `ComponentKind::Custom(kind)`; replaces any painter
    /// already registered for `kind`.
    pub fn register_custom_painter(&mut self, kind: u32, painter: impl CustomPainter + 'static) {
        self.painters.insert(kind, Box::new(painter));
    }

    /// Hit test against the last painted frame, bounded by the configured
    /// ancestor depth.
    pub fn node_at(&self, tree: &Tree, point: Vector2) -> Option<NodeId> {
        tree.node_at(point, self.config.max_ancestor_depth)
    }

    /// Resolves geometry for `root` and everything below it; returns the
    /// root's size.
    pub fn layout(&self, tree: &mut Tree, root: NodeId, constraint: Constraint) -> Result<Dimensions, Error> {
        if tree.get(root).is_none() {
            return Err(Error::UnknownNode(root));
        }
        let mut cx = LayoutCx::new(tree, &self.registry, self.measure_text_fn.as_ref(), &self.config);
        Ok(cx.run(root, constraint))
    }

    /// Appends the main pass and, when anything was deferred, the overlay pass
    /// for `root` to `buffer`.
    ///
    /// Subtrees whose layout was never resolved are skipped and reported in
    /// [`Error::LayoutNotResolved`]; everything else is still painted.
    pub fn generate_commands(
        &self,
        tree: &mut Tree,
        root: NodeId,
        buffer: &mut CommandBuffer,
        initial_opacity: f32,
    ) -> Result<(), Error> {
        if tree.get(root).is_none() {
            return Err(Error::UnknownNode(root));
        }
        Generator::new(
            tree,
            buffer,
            &self.config,
            self.measure_text_fn.as_ref(),
            self.evaluator.as_deref(),
            &self.painters,
            root,
            initial_opacity,
        )
        .run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Fill;
    use crate::layout::Dimension;
    use crate::node::{Drag, DropdownState, ModalState};
    use crate::render_commands::{Rectangle, Text};

    fn rects(buffer: &CommandBuffer) -> Vec<(u32, BoundingBox, &Rectangle)> {
        buffer
            .iter()
            .filter_map(|c| match &c.config {
                RenderCommandConfig::Rectangle(rect) => Some((c.id, c.bounding_box, rect)),
                _ => None,
            })
            .collect()
    }

    fn texts(buffer: &CommandBuffer) -> Vec<(BoundingBox, &Text)> {
        buffer
            .iter()
            .filter_map(|c| match &c.config {
                RenderCommandConfig::Text(text) => Some((c.bounding_box, text)),
                _ => None,
            })
            .collect()
    }

    fn count(buffer: &CommandBuffer, pred: impl Fn(&RenderCommandConfig) -> bool) -> usize {
        buffer.iter().filter(|c| pred(&c.config)).count()
    }

    fn position(buffer: &CommandBuffer, pred: impl Fn(&RenderCommand) -> bool) -> Option<usize> {
        buffer.iter().position(pred)
    }

    fn paint(pipeline: &Pipeline, tree: &mut Tree, root: NodeId) -> CommandBuffer {
        let mut buffer = CommandBuffer::new();
        pipeline
            .generate_commands(tree, root, &mut buffer, 1.0)
            .unwrap();
        buffer
    }

    fn block(tree: &mut Tree, parent: NodeId, width: f32, height: f32, color: Color) -> NodeId {
        let id = tree.add_child(parent, ComponentKind::Container);
        tree[id].style.size(width, height).background(color);
        id
    }

    struct Names;

    impl Evaluator for Names {
        fn eval_text(&self, expression: &str, _: u32) -> Option<String> {
            (expression == "user.name").then(|| "Ada".to_string())
        }

        fn eval_condition(&self, expression: &str, _: u32) -> Option<bool> {
            match expression {
                "hidden" => Some(false),
                _ => None,
            }
        }
    }

    #[test]
    fn column_hugs_children_plus_gap() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.gap(10.0);
        for height in [40.0, 60.0] {
            let child = tree.add_child(root, ComponentKind::Container);
            tree[child].style.height(Dimension::Px(height));
        }

        let size = pipeline.layout(&mut tree, root, Constraint::loose(400.0, 600.0)).unwrap();
        assert_eq!(size.height, 110.0);
        let second = tree[root].children()[1];
        assert_eq!(tree[second].layout().y, 50.0);
    }

    #[test]
    fn grow_splits_row_evenly() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Row);
        tree[root].style.width(Dimension::Px(300.0));
        let children: Vec<NodeId> = (0..3)
            .map(|_| {
                let child = tree.add_child(root, ComponentKind::Container);
                tree[child].style.grow(1.0);
                child
            })
            .collect();

        pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();
        for (index, child) in children.into_iter().enumerate() {
            let layout = tree[child].layout();
            assert_eq!(layout.width, 100.0);
            assert_eq!(layout.x, index as f32 * 100.0);
        }
    }

    #[test]
    fn empty_table_is_a_placeholder_box() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let table = tree.add_child(root, ComponentKind::Table);

        pipeline.layout(&mut tree, root, Constraint::unbounded()).unwrap();
        let layout = tree[table].layout();
        assert!(layout.valid);
        assert_eq!((layout.width, layout.height), (100.0, 50.0));
        assert!(layout.width.is_finite() && layout.height.is_finite());
    }

    #[test]
    fn layout_and_paint_are_idempotent() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.padding(8.0).gap(4.0);
        let row = tree.add_child(root, ComponentKind::Row);
        block(&mut tree, row, 30.0, 20.0, Color::BLACK);
        let text = tree.add_child(row, ComponentKind::Text);
        tree[text].text("hello");

        let constraint = Constraint::loose(320.0, 240.0);
        pipeline.layout(&mut tree, root, constraint).unwrap();
        let first: Vec<_> = tree.ids().map(|id| *tree[id].layout()).collect();
        let first_commands = paint(&pipeline, &mut tree, root);

        pipeline.layout(&mut tree, root, constraint).unwrap();
        let second: Vec<_> = tree.ids().map(|id| *tree[id].layout()).collect();
        let second_commands = paint(&pipeline, &mut tree, root);

        assert_eq!(first, second);
        assert_eq!(first_commands, second_commands);
    }

    #[test]
    fn flow_children_stay_inside_the_content_box() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Row);
        tree[root].style.size(200.0, 100.0).padding(5.0).gap(5.0);
        let children: Vec<NodeId> = (0..3)
            .map(|_| block(&mut tree, root, 50.0, 40.0, Color::BLACK))
            .collect();

        pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();
        for child in children {
            let layout = tree[child].layout();
            assert!(layout.x >= 5.0 && layout.x + layout.width <= 195.0);
            assert!(layout.y >= 5.0 && layout.y + layout.height <= 95.0);
        }
    }

    #[test]
    fn table_beside_text_fits_its_row() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Row);
        tree[root].style.width(Dimension::Px(400.0));
        let label = tree.add_child(root, ComponentKind::Text);
        tree[label].text("label");
        let table = tree.add_child(root, ComponentKind::Table);
        let row = tree.add_child(table, ComponentKind::TableRow);
        let cell = tree.add_child(row, ComponentKind::TableCell);
        tree[cell].text("x");

        pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();
        let layout = *tree[table].layout();
        assert_eq!(layout.x, 40.0);
        // "x" is 8 + 16 padding, floored at 30, plus two 1px borders.
        assert_eq!(layout.width, 32.0);
        assert!(layout.x + layout.width <= 400.0);
    }

    #[test]
    fn containment_holds_under_pressure() {
        let pipeline = Pipeline::default();

        // Grow children next to a fixed sibling, one of them capped.
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Row);
        tree[root].style.size(300.0, 40.0).gap(10.0);
        let fixed = block(&mut tree, root, 100.0, 20.0, Color::BLACK);
        let capped = tree.add_child(root, ComponentKind::Container);
        tree[capped].style.grow(1.0).max_width(50.0);
        let open = tree.add_child(root, ComponentKind::Container);
        tree[open].style.grow(1.0);
        pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();

        let children = [fixed, capped, open];
        let used: f32 = children.iter().map(|&c| tree[c].layout().width).sum();
        assert!(engine::float_equal(used + 20.0, 300.0));
        for child in children {
            let layout = tree[child].layout();
            assert!(layout.x >= 0.0 && layout.x + layout.width <= 300.0 + engine::EPSILON);
        }

        // Long text wraps inside a narrow column instead of spilling out.
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.width(Dimension::Px(120.0)).padding(10.0);
        let text = tree.add_child(root, ComponentKind::Text);
        tree[text].text("a sentence that is far too long for one line");
        pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();

        let layout = *tree[text].layout();
        assert!(layout.x >= 10.0 && layout.x + layout.width <= 110.0);
        assert!(layout.height > 24.0);
        assert!(layout.y + layout.height <= tree[root].layout().height - 10.0 + engine::EPSILON);
    }

    #[test]
    fn nested_opacity_multiplies() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let mut parent = root;
        for _ in 0..3 {
            let child = tree.add_child(parent, ComponentKind::Container);
            tree[child].style.opacity(0.5);
            parent = child;
        }
        tree[parent].style.size(10.0, 10.0).background(Color::BLACK);

        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        let set: Vec<f32> = buffer
            .iter()
            .filter_map(|c| match c.config {
                RenderCommandConfig::SetOpacity(value) => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(set, vec![0.5, 0.25, 0.125]);
        assert_eq!(count(&buffer, |c| matches!(c, RenderCommandConfig::PopOpacity)), 3);
        let rects = rects(&buffer);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].2.color.a, 255.0 * 0.125);
    }

    #[test]
    fn nan_opacity_paints_opaque() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let faded = tree.add_child(root, ComponentKind::Container);
        tree[faded].style.opacity(f32::NAN);
        block(&mut tree, faded, 10.0, 10.0, Color::BLACK);

        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        assert_eq!(count(&buffer, |c| matches!(c, RenderCommandConfig::SetOpacity(_))), 0);
        assert_eq!(count(&buffer, |c| matches!(c, RenderCommandConfig::PopOpacity)), 0);
        let rects = rects(&buffer);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].2.color.a, 255.0);
    }

    #[test]
    fn opacity_depth_is_capped() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let mut parent = root;
        for _ in 0..20 {
            let child = tree.add_child(parent, ComponentKind::Container);
            tree[child].style.opacity(0.9);
            parent = child;
        }

        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);
        assert_eq!(count(&buffer, |c| matches!(c, RenderCommandConfig::SetOpacity(_))), 16);
        assert_eq!(count(&buffer, |c| matches!(c, RenderCommandConfig::PopOpacity)), 16);
    }

    #[test]
    fn overlays_follow_the_main_pass_in_recorded_order() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.size(400.0, 400.0);

        let modal = tree.add_child(root, ComponentKind::Modal);
        tree[modal].state(NodeState::Modal(ModalState {
            open: true,
            title: Some("Settings".into()),
            ..Default::default()
        }));
        let dropdown = tree.add_child(root, ComponentKind::Dropdown);
        tree[dropdown].state(NodeState::Dropdown(DropdownState {
            open: true,
            options: vec!["one".into(), "two".into()],
            ..Default::default()
        }));
        let after = block(&mut tree, root, 50.0, 50.0, Color::rgb(0.0, 0.0, 255.0));

        pipeline.layout(&mut tree, root, Constraint::loose(400.0, 400.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        let end_main = position(&buffer, |c| c.config == RenderCommandConfig::EndPass(Pass::Main)).unwrap();
        let after_rect = position(&buffer, |c| c.id == tree[after].id).unwrap();
        let first_modal = position(&buffer, |c| c.id == tree[modal].id).unwrap();
        let first_dropdown = position(&buffer, |c| c.id == tree[dropdown].id).unwrap();
        assert!(after_rect < end_main);
        assert!(end_main < first_modal);
        assert!(first_modal < first_dropdown);

        let backdrop = buffer.pass(Pass::Overlay).next().map(|c| c.bounding_box);
        assert_eq!(backdrop, Some(BoundingBox::new(0.0, 0.0, 400.0, 400.0)));
        assert_eq!(buffer.iter().last().map(|c| c.config.clone()), Some(RenderCommandConfig::EndPass(Pass::Overlay)));
    }

    #[test]
    fn overlay_overflow_paints_inline() {
        let pipeline = Pipeline::new(Config::default().max_overlays(1));
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let mut dropdowns = Vec::new();
        for _ in 0..2 {
            let dropdown = tree.add_child(root, ComponentKind::Dropdown);
            tree[dropdown].state(NodeState::Dropdown(DropdownState {
                open: true,
                options: vec!["a".into(), "b".into()],
                ..Default::default()
            }));
            dropdowns.push(dropdown);
        }

        pipeline.layout(&mut tree, root, Constraint::loose(400.0, 400.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);
        let main: Vec<u32> = buffer.pass(Pass::Main).map(|c| c.id).collect();
        let overlay: Vec<u32> = buffer.pass(Pass::Overlay).map(|c| c.id).collect();
        assert!(main.contains(&tree[dropdowns[1]].id));
        assert!(overlay.iter().all(|&id| id == tree[dropdowns[0]].id));
        assert!(!overlay.is_empty());

        // Both menus are painted: the deferred one in the overlay pass, the
        // inline one in the main pass.
        let option_b = |pass: Pass, owner: NodeId| {
            buffer
                .pass(pass)
                .filter(|c| c.id == tree[owner].id)
                .filter(|c| matches!(&c.config, RenderCommandConfig::Text(t) if t.text == "b"))
                .count()
        };
        assert_eq!(option_b(Pass::Overlay, dropdowns[0]), 1);
        assert_eq!(option_b(Pass::Main, dropdowns[1]), 1);
        assert_eq!(option_b(Pass::Main, dropdowns[0]), 0);
    }

    #[test]
    fn absolute_children_paint_by_z_index() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Container);
        tree[root].style.size(100.0, 100.0);
        let mut by_z = Vec::new();
        for (z, x) in [(3, 0.0), (1, 20.0), (2, 40.0)] {
            let child = block(&mut tree, root, 10.0, 10.0, Color::BLACK);
            tree[child].style.absolute(x, 0.0).z_index(z);
            by_z.push((z, tree[child].id));
        }
        by_z.sort();

        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);
        let order: Vec<u32> = rects(&buffer).into_iter().map(|(id, _, _)| id).collect();
        let expected: Vec<u32> = by_z.into_iter().map(|(_, id)| id).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn dragged_child_paints_last_under_the_pointer() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Row);
        tree[root].style.size(300.0, 50.0);
        let children: Vec<NodeId> = (0..3)
            .map(|_| block(&mut tree, root, 50.0, 50.0, Color::BLACK))
            .collect();
        tree[root].drag(Some(Drag {
            index: 0,
            pointer_x: 200.0,
        }));

        pipeline.layout(&mut tree, root, Constraint::loose(300.0, 50.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);
        let rects = rects(&buffer);
        let (last_id, last_bounds, _) = rects[rects.len() - 1];
        assert_eq!(last_id, tree[children[0]].id);
        assert_eq!(last_bounds.x, 175.0);
        assert_eq!(rects[0].0, tree[children[1]].id);
    }

    #[test]
    fn unresolved_subtree_is_refused_and_reported() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let laid_out = block(&mut tree, root, 20.0, 20.0, Color::BLACK);
        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();

        let late = block(&mut tree, root, 20.0, 20.0, Color::WHITE);
        let mut buffer = CommandBuffer::new();
        let result = pipeline.generate_commands(&mut tree, root, &mut buffer, 1.0);

        match result {
            Err(Error::LayoutNotResolved { nodes }) => assert_eq!(nodes, vec![late]),
            other => panic!("Expected LayoutNotResolved, got {other:?}"),
        }
        let ids: Vec<u32> = rects(&buffer).into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![tree[laid_out].id]);
        assert!(tree.rendered_bounds(late).is_none());
    }

    #[test]
    fn wireframe_replaces_paint_of_reactive_nodes() {
        let config = Config::default().wireframe(WireframeConfig {
            enabled: true,
            ..Default::default()
        });
        let pipeline = Pipeline::new(config);
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let bound = tree.add_child(root, ComponentKind::Text);
        tree[bound].text("fallback").text_expression("user.name");
        tree[bound].style.background(Color::BLACK);
        let gated = tree.add_child(root, ComponentKind::Container);
        tree[gated].visible_when(Condition::when_true("show"));
        let inside = block(&mut tree, gated, 10.0, 10.0, Color::WHITE);

        pipeline.layout(&mut tree, root, Constraint::loose(200.0, 200.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        let labels: Vec<&str> = texts(&buffer).into_iter().map(|(_, t)| t.text.as_str()).collect();
        assert_eq!(labels, vec!["{{user.name}}", "?show"]);
        assert_eq!(
            count(&buffer, |c| matches!(c, RenderCommandConfig::Border(b) if b.color == config.wireframe.color)),
            2
        );
        let ids: Vec<u32> = rects(&buffer).into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![tree[inside].id]);
    }

    #[test]
    fn registry_is_shared_between_pipelines() {
        let registry = StrategyRegistry::shared();
        let first = Pipeline::with_registry(Config::default(), Arc::clone(&registry));
        let second = Pipeline::with_registry(Config::default().trace_layout(true), Arc::clone(&registry));
        assert!(Arc::ptr_eq(first.registry(), second.registry()));
        assert_eq!(Arc::strong_count(&registry), 3);
    }

    #[test]
    fn evaluator_drives_text_and_visibility() {
        let mut pipeline = Pipeline::default();
        pipeline.set_evaluator(Names);
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let name = tree.add_child(root, ComponentKind::Text);
        tree[name].text("nobody").text_expression("user.name");
        let hidden = block(&mut tree, root, 10.0, 10.0, Color::BLACK);
        tree[hidden].visible_when(Condition::when_true("hidden"));
        let unknown = block(&mut tree, root, 10.0, 10.0, Color::WHITE);
        tree[unknown].visible_when(Condition::when_true("unknown"));

        pipeline.layout(&mut tree, root, Constraint::loose(200.0, 200.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);
        let labels: Vec<&str> = texts(&buffer).into_iter().map(|(_, t)| t.text.as_str()).collect();
        assert_eq!(labels, vec!["Ada"]);
        let ids: Vec<u32> = rects(&buffer).into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![tree[unknown].id]);
    }

    #[test]
    fn custom_kinds_use_their_painter_or_fall_back() {
        let mut pipeline = Pipeline::default();
        pipeline.register_custom_painter(1, |node: &Node, bounds: BoundingBox, _: f32, out: &mut CommandBuffer| {
            out.push(RenderCommand::new(
                node.id,
                bounds,
                RenderCommandConfig::Line(render_commands::Line {
                    from: Vector2::new(bounds.x, bounds.y),
                    to: Vector2::new(bounds.x + bounds.width, bounds.y + bounds.height),
                    width: 1.0,
                    color: Color::BLACK,
                }),
            ));
        });
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let gauge = tree.add_child(root, ComponentKind::Custom(1));
        tree[gauge].style.size(20.0, 20.0);
        let unknown = tree.add_child(root, ComponentKind::Custom(2));
        tree[unknown].style.size(20.0, 20.0).background(Color::BLACK);

        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        assert!(buffer
            .iter()
            .any(|c| c.id == tree[gauge].id && matches!(c.config, RenderCommandConfig::Line(_))));
        assert!(buffer
            .iter()
            .any(|c| c.id == tree[unknown].id && matches!(&c.config, RenderCommandConfig::Custom(custom) if custom.kind == 2)));
        assert_eq!(rects(&buffer).len(), 1);
    }

    #[test]
    fn table_cells_paint_from_the_table_origin() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.padding(10.0);
        let table = tree.add_child(root, ComponentKind::Table);

        let head = tree.add_child(table, ComponentKind::TableHead);
        let head_row = tree.add_child(head, ComponentKind::TableRow);
        let header = tree.add_child(head_row, ComponentKind::TableHeaderCell);
        tree[header].text("Name");
        let body = tree.add_child(table, ComponentKind::TableBody);
        let body_row = tree.add_child(body, ComponentKind::TableRow);
        let cell = tree.add_child(body_row, ComponentKind::TableCell);
        tree[cell].text("Ada");

        pipeline.layout(&mut tree, root, Constraint::loose(400.0, 400.0)).unwrap();
        let buffer = paint(&pipeline, &mut tree, root);

        let texts = texts(&buffer);
        let name = texts.iter().find(|(_, t)| t.text == "Name").unwrap();
        let ada = texts.iter().find(|(_, t)| t.text == "Ada").unwrap();
        assert!(name.1.bold);
        assert!(!ada.1.bold);
        // table origin 10, grid border 1, cell padding 8
        assert_eq!(ada.0.x, 19.0);

        let local = tree.rendered_bounds(cell).unwrap();
        assert_eq!(local.x, 1.0);
        let inside = Vector2::new(10.0 + local.x + 2.0, 10.0 + local.y + 2.0);
        assert_eq!(pipeline.node_at(&tree, inside), Some(cell));

        // the header cell picks up the default header background
        assert!(rects(&buffer)
            .iter()
            .any(|(id, _, r)| *id == tree[header].id && r.color == Color::rgb(240.0, 240.0, 240.0)));
    }

    #[test]
    fn transform_moves_own_bounds_only() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let parent = block(&mut tree, root, 40.0, 40.0, Color::BLACK);
        tree[parent].style.scale(2.0, 2.0).translate(5.0, 0.0);
        let child = block(&mut tree, parent, 10.0, 10.0, Color::WHITE);

        pipeline.layout(&mut tree, root, Constraint::loose(200.0, 200.0)).unwrap();
        paint(&pipeline, &mut tree, root);
        assert_eq!(tree.rendered_bounds(parent), Some(BoundingBox::new(-15.0, -20.0, 80.0, 80.0)));
        assert_eq!(tree.rendered_bounds(child), Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn root_background_is_skipped_by_default() {
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        tree[root].style.size(50.0, 50.0).background(Color::BLACK);

        let pipeline = Pipeline::default();
        pipeline.layout(&mut tree, root, Constraint::loose(100.0, 100.0)).unwrap();
        assert!(rects(&paint(&pipeline, &mut tree, root)).is_empty());

        let pipeline = Pipeline::new(Config::default().skip_root_background(false));
        assert_eq!(rects(&paint(&pipeline, &mut tree, root)).len(), 1);
        assert!(matches!(tree[root].style.background, Fill::Solid(_)));
    }

    #[test]
    fn unknown_root_is_an_error() {
        let pipeline = Pipeline::default();
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let mut other = Tree::new();
        other.add_root(ComponentKind::Column);
        let stray = other.add_child(root, ComponentKind::Text);
        assert_eq!(
            pipeline.layout(&mut tree, stray, Constraint::unbounded()),
            Err(Error::UnknownNode(stray))
        );
    }
}
