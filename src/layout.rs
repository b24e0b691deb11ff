#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::BoundingBox;

/// How a node's width or height is declared.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimension {
    /// Width fills the available constraint, height follows content.
    #[default]
    Auto,
    /// A fixed size in pixels, used verbatim.
    Px(f32),
    /// A fraction of the incoming maximum. Value should be between `0.0` and `1.0`.
    Percent(f32),
}

impl Dimension {
    /// Resolves against the incoming maximum. `None` means "decide from
    /// content or constraint".
    pub(crate) fn resolve(self, available: f32) -> Option<f32> {
        match self {
            Dimension::Auto => None,
            Dimension::Px(value) => Some(value),
            Dimension::Percent(fraction) if available.is_finite() => Some(available * fraction),
            Dimension::Percent(_) => None,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Dimension::Auto)
    }

    /// Returns the pixel value when the dimension is explicit.
    pub fn px(self) -> Option<f32> {
        match self {
            Dimension::Px(value) => Some(value),
            _ => None,
        }
    }
}

/// Represents padding or margin values for each side of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spacing {
    /// Spacing on the left side.
    pub left: f32,
    /// Spacing on the right side.
    pub right: f32,
    /// Spacing on the top side.
    pub top: f32,
    /// Spacing on the bottom side.
    pub bottom: f32,
}

impl Spacing {
    /// Creates a new `Spacing` with individual values for each side.
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Sets the same value for all sides.
    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sets the same value for left and right sides.
    /// Top and bottom are set to `0`.
    pub fn horizontal(value: f32) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    /// Sets the same value for top and bottom sides.
    /// Left and right are set to `0`.
    pub fn vertical(value: f32) -> Self {
        Self::new(0.0, 0.0, value, value)
    }

    pub fn horizontal_total(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_total(&self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Spacing {
    /// Creates spacing with the same value for all sides.
    fn from(value: f32) -> Self {
        Self::all(value)
    }
}

impl From<(f32, f32, f32, f32)> for Spacing {
    /// Creates spacing from a tuple in CSS order: (top, right, bottom, left).
    fn from((top, right, bottom, left): (f32, f32, f32, f32)) -> Self {
        Self { left, right, top, bottom }
    }
}

/// Defines the layout direction for arranging child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum LayoutDirection {
    /// Arranges elements from left to right (a row).
    LeftToRight,
    /// Arranges elements from top to bottom (a column).
    #[default]
    TopToBottom,
}

/// Whether a node takes part in its parent's flow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Position {
    #[default]
    Flow,
    /// Placed at the anchor verbatim; siblings lay out as if it were absent.
    Absolute { x: f32, y: f32 },
}

/// The resolved geometry of a node after a layout pass.
///
/// Flow nodes are relative to their parent's origin, absolute nodes hold their
/// anchor. Table sections, rows and cells are relative to the table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputedLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set once the node's pass completes; cleared when a new pass starts.
    pub valid: bool,
}

impl ComputedLayout {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }
}

/// Shorthand macro for [`Dimension::Px`].
#[macro_export]
macro_rules! fixed {
    ($val:expr) => {
        $crate::layout::Dimension::Px($val)
    };
}

/// Shorthand macro for [`Dimension::Percent`].
/// The value has to be in range `0.0..=1.0`.
#[macro_export]
macro_rules! percent {
    ($percent:expr) => {{
        const _: () = assert!(
            $percent >= 0.0 && $percent <= 1.0,
            "Percent value must be between 0.0 and 1.0 inclusive!"
        );
        $crate::layout::Dimension::Percent($percent)
    }};
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_macro() {
        let value = fixed!(123.0);
        assert!(matches!(value, Dimension::Px(123.0)));
    }

    #[test]
    fn percent_macro() {
        let value = percent!(0.5);
        assert!(matches!(value, Dimension::Percent(0.5)));
    }

    #[test]
    fn percent_needs_a_bounded_parent() {
        assert_eq!(Dimension::Percent(0.25).resolve(400.0), Some(100.0));
        assert_eq!(Dimension::Percent(0.25).resolve(f32::INFINITY), None);
        assert_eq!(Dimension::Auto.resolve(400.0), None);
        assert_eq!(Dimension::Px(7.0).resolve(f32::INFINITY), Some(7.0));
    }

    #[test]
    fn spacing_from_css_tuple() {
        let s = Spacing::from((1.0, 2.0, 3.0, 4.0));
        assert_eq!(s, Spacing::new(4.0, 2.0, 1.0, 3.0));
        assert_eq!(s.horizontal_total(), 6.0);
        assert_eq!(s.vertical_total(), 4.0);
    }
}
