#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::math::Dimensions;
use crate::node::{ComponentKind, Node};

/// Which nodes the debug wireframe outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WireframeFilter {
    /// Nodes carrying a reactive text expression or a visibility condition.
    #[default]
    Reactive,
    All,
    Kind(ComponentKind),
}

impl WireframeFilter {
    pub(crate) fn matches(self, node: &Node) -> bool {
        match self {
            WireframeFilter::Reactive => {
                node.text_expression.is_some() || node.visible_when.is_some()
            }
            WireframeFilter::All => true,
            WireframeFilter::Kind(kind) => node.kind == kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireframeConfig {
    pub enabled: bool,
    pub color: Color,
    pub filter: WireframeFilter,
    pub label_font_size: f32,
}

impl Default for WireframeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::rgb(255.0, 0.0, 255.0),
            filter: WireframeFilter::Reactive,
            label_font_size: 10.0,
        }
    }
}

/// Knobs fixed at pipeline construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Emits a `trace!` line per node with its resolved geometry.
    pub trace_layout: bool,
    pub wireframe: WireframeConfig,
    pub max_opacity_depth: usize,
    pub max_overlays: usize,
    pub max_ancestor_depth: usize,
    /// Modal backdrop size when the root has no usable layout.
    pub viewport_fallback: Dimensions,
    pub skip_root_background: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_layout: false,
            wireframe: WireframeConfig::default(),
            max_opacity_depth: 16,
            max_overlays: 16,
            max_ancestor_depth: 100,
            viewport_fallback: Dimensions::new(800.0, 600.0),
            skip_root_background: true,
        }
    }
}

impl Config {
    #[inline]
    pub fn trace_layout(mut self, enabled: bool) -> Self {
        self.trace_layout = enabled;
        self
    }

    #[inline]
    pub fn wireframe(mut self, wireframe: WireframeConfig) -> Self {
        self.wireframe = wireframe;
        self
    }

    #[inline]
    pub fn max_opacity_depth(mut self, depth: usize) -> Self {
        self.max_opacity_depth = depth;
        self
    }

    #[inline]
    pub fn max_overlays(mut self, count: usize) -> Self {
        self.max_overlays = count;
        self
    }

    #[inline]
    pub fn max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }

    #[inline]
    pub fn viewport_fallback(mut self, size: Dimensions) -> Self {
        self.viewport_fallback = size;
        self
    }

    #[inline]
    pub fn skip_root_background(mut self, skip: bool) -> Self {
        self.skip_root_background = skip;
        self
    }
}
