//! Per-kind sizing and arrangement.
//!
//! A [`Strategy`] is a pair of plain function pointers. The registry maps a
//! [`ComponentKind`] to one and is frozen once built; it is shared between
//! pipelines through an `Arc`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::engine::{self, LayoutCx};
use crate::flex;
use crate::math::{Constraint, Dimensions};
use crate::node::{ComponentKind, NodeId};
use crate::table;

/// The size `layout_node` resolved for a node before its arrangement runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub size: Dimensions,
    /// The constraint the node itself was given.
    pub constraint: Constraint,
    /// Width was `Auto` and came from the constraint or content.
    pub auto_width: bool,
    /// Height was `Auto` and came from content.
    pub auto_height: bool,
}

/// Content size under a constraint, padding included.
pub type MeasureFn = fn(&mut LayoutCx<'_>, NodeId, Constraint) -> Dimensions;
/// Lays out and positions the node's children; returns the node's final size.
pub type ArrangeFn = fn(&mut LayoutCx<'_>, NodeId, Frame) -> Dimensions;

#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub measure: MeasureFn,
    pub arrange: ArrangeFn,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

impl Strategy {
    pub const fn new(name: &'static str, measure: MeasureFn, arrange: ArrangeFn) -> Self {
        Self {
            name,
            measure,
            arrange,
        }
    }
}

const FLEX: Strategy = Strategy::new("flex", flex::measure, flex::arrange);
const CENTER: Strategy = Strategy::new("center", flex::measure_center, flex::arrange_center);
const TEXT: Strategy = Strategy::new("text", engine::measure_text_leaf, engine::arrange_leaf);
const TEXT_BLOCK: Strategy = Strategy::new(
    "text-block",
    engine::measure_text_block,
    engine::arrange_text_block,
);
const BUTTON: Strategy = Strategy::new("button", engine::measure_button, engine::arrange_leaf);
const INPUT: Strategy = Strategy::new("input", engine::measure_input, engine::arrange_leaf);
const CHECKBOX: Strategy = Strategy::new("checkbox", engine::measure_checkbox, engine::arrange_leaf);
const DROPDOWN: Strategy = Strategy::new("dropdown", engine::measure_dropdown, engine::arrange_leaf);
const IMAGE: Strategy = Strategy::new("image", engine::measure_image, engine::arrange_leaf);
const RULE: Strategy = Strategy::new("horizontal-rule", engine::measure_rule, engine::arrange_leaf);
const MODAL: Strategy = Strategy::new("modal", flex::measure_modal, flex::arrange_modal);
const TAB_GROUP: Strategy = Strategy::new("tab-group", flex::measure_tab_group, flex::arrange_tab_group);
const TAB_BAR: Strategy = Strategy::new("tab-bar", flex::measure_tab_bar, flex::arrange_tab_bar);
const TAB: Strategy = Strategy::new("tab", flex::measure_tab, engine::arrange_leaf);
const TAB_CONTENT: Strategy = Strategy::new(
    "tab-content",
    flex::measure_tab_content,
    flex::arrange_tab_content,
);
const TAB_PANEL: Strategy = Strategy::new("tab-panel", flex::measure_column, flex::arrange_column);
const TABLE: Strategy = Strategy::new("table", table::measure, table::arrange);
/// Table sections, rows and cells are placed by the table pass; on their own
/// they behave as leaves.
const TABLE_PART: Strategy = Strategy::new("table-part", engine::measure_empty, engine::arrange_leaf);
/// Used for kinds nobody registered, custom kinds included.
const FALLBACK: Strategy = Strategy::new("fallback", engine::measure_fallback, engine::arrange_fallback);

/// Read-only map from component kind to strategy.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: FxHashMap<ComponentKind, Strategy>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        RegistryBuilder::with_defaults().into_registry()
    }
}

impl StrategyRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::with_defaults()
    }

    /// The built-in strategies, ready to share.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Strategy> {
        self.strategies.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub(crate) fn resolve(&self, kind: ComponentKind) -> Strategy {
        self.get(kind).copied().unwrap_or(FALLBACK)
    }
}

/// Collects strategies; the only way to change what a registry holds.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    strategies: FxHashMap<ComponentKind, Strategy>,
}

impl RegistryBuilder {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        use ComponentKind::*;

        let mut builder = Self::empty();
        for kind in [Container, Row, Column, Markdown, List] {
            builder.register(kind, FLEX);
        }
        builder.register(Center, CENTER);
        for kind in [Text, Strong, Em, Small, Mark, CodeInline] {
            builder.register(kind, TEXT);
        }
        for kind in [Heading, Paragraph, Blockquote, CodeBlock, ListItem, Link] {
            builder.register(kind, TEXT_BLOCK);
        }
        builder
            .register(Button, BUTTON)
            .register(Input, INPUT)
            .register(Checkbox, CHECKBOX)
            .register(Dropdown, DROPDOWN)
            .register(Image, IMAGE)
            .register(HorizontalRule, RULE)
            .register(Modal, MODAL)
            .register(TabGroup, TAB_GROUP)
            .register(TabBar, TAB_BAR)
            .register(Tab, TAB)
            .register(TabContent, TAB_CONTENT)
            .register(TabPanel, TAB_PANEL)
            .register(Table, TABLE);
        for kind in [TableHead, TableBody, TableFoot, TableRow, TableCell, TableHeaderCell] {
            builder.register(kind, TABLE_PART);
        }
        builder
    }

    /// Adds or replaces the strategy for `kind`.
    pub fn register(&mut self, kind: ComponentKind, strategy: Strategy) -> &mut Self {
        self.strategies.insert(kind, strategy);
        self
    }

    fn into_registry(self) -> StrategyRegistry {
        StrategyRegistry {
            strategies: self.strategies,
        }
    }

    pub fn build(self) -> Arc<StrategyRegistry> {
        Arc::new(self.into_registry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_measure(_: &mut LayoutCx<'_>, _: NodeId, _: Constraint) -> Dimensions {
        Dimensions::new(12.0, 34.0)
    }

    #[test]
    fn defaults_cover_every_builtin_kind() {
        let registry = StrategyRegistry::default();
        assert_eq!(registry.get(ComponentKind::Row).map(|s| s.name), Some("flex"));
        assert_eq!(registry.get(ComponentKind::Table).map(|s| s.name), Some("table"));
        assert_eq!(registry.get(ComponentKind::TableCell).map(|s| s.name), Some("table-part"));
        assert!(registry.get(ComponentKind::Custom(7)).is_none());
        assert_eq!(registry.resolve(ComponentKind::Custom(7)).name, "fallback");
    }

    #[test]
    fn builder_overrides_and_shares() {
        let mut builder = StrategyRegistry::builder();
        builder.register(
            ComponentKind::Custom(1),
            Strategy::new("gauge", fixed_measure, engine::arrange_leaf),
        );
        let registry = builder.build();
        let other = Arc::clone(&registry);
        assert_eq!(other.get(ComponentKind::Custom(1)).map(|s| s.name), Some("gauge"));
        assert_eq!(Arc::strong_count(&registry), 2);
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_shareable<T: Send + Sync>() {}
        assert_shareable::<Arc<StrategyRegistry>>();
    }
}
