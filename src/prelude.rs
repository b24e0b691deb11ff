//! A single import for building trees and running the pipeline.
//!
//! ```rust
//! use ply_pipeline::prelude::*;
//!
//! let mut tree = Tree::new();
//! let root = tree.add_root(ComponentKind::Column);
//! tree[root].style.size(200.0, 100.0).padding(8.0);
//! let label = tree.add_child(root, ComponentKind::Text);
//! tree[label].text("hello");
//!
//! let pipeline = Pipeline::default();
//! pipeline.layout(&mut tree, root, Constraint::loose(800.0, 600.0)).unwrap();
//! let mut commands = CommandBuffer::new();
//! pipeline.generate_commands(&mut tree, root, &mut commands, 1.0).unwrap();
//! assert!(commands.iter().any(|c| matches!(c.config, RenderCommandConfig::Text(_))));
//! ```

// Core types
pub use crate::Pipeline;
pub use crate::config::{Config, WireframeConfig, WireframeFilter};
pub use crate::errors::Error;
pub use crate::node::{
    ComponentKind, Drag, DropdownState, InputState, ModalState, Node, NodeId, NodeState,
    TabGroupState, Tree,
};
pub use crate::table::{CellSpan, ColumnDef, TableState, TableStyle};

// Collaborators
pub use crate::emitters::CustomPainter;
pub use crate::expr::{Condition, Evaluator};
pub use crate::strategy::{Frame, RegistryBuilder, Strategy, StrategyRegistry};
pub use crate::engine::LayoutCx;

// Macros
pub use crate::{fixed, percent};

// Geometry and style
pub use crate::align::{Align, Justify};
pub use crate::color::Color;
pub use crate::elements::{Border, Fill, Font, Gradient, GradientKind, GradientStop, Shadow, Style, Transform};
pub use crate::layout::{ComputedLayout, Dimension, Position, Spacing};
pub use crate::math::{BoundingBox, Constraint, Dimensions, Vector2};

// LayoutDirection variants
pub use crate::layout::LayoutDirection::{self, *};

// Commands
pub use crate::render_commands::{CommandBuffer, Pass, RenderCommand, RenderCommandConfig};
