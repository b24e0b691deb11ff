#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::align::{Align, Justify};
use crate::color::Color;
use crate::layout::{Dimension, LayoutDirection, Position, Spacing};
use crate::math::{BoundingBox, Dimensions};

/// Border drawn around a node's box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Border {
    pub width: f32,
    pub color: Color,
    /// Corner radius shared by the background and the border.
    pub radius: f32,
}

/// Drop shadow drawn below the background.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    /// Passed through to the backend untouched.
    pub blur_radius: f32,
    pub spread_radius: f32,
    /// `None` draws a semi-transparent black shadow.
    pub color: Option<Color>,
    /// Inset shadows are not emitted.
    pub inset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientStop {
    /// Offset along the gradient, `0.0..=1.0`.
    pub position: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gradient {
    pub kind: GradientKind,
    /// Degrees, linear gradients only.
    pub angle: f32,
    pub stops: Vec<GradientStop>,
}

/// What fills a node's background.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
    Gradient(Gradient),
}

impl Fill {
    pub fn solid(&self) -> Option<Color> {
        match self {
            Fill::Solid(color) => Some(*color),
            _ => None,
        }
    }
}

/// Font settings. Zero values mean "use the component's default".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Font {
    pub size: f32,
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    /// Multiplier of the font size.
    pub line_height: f32,
}

impl Font {
    pub fn size_or(&self, default: f32) -> f32 {
        if self.size > 0.0 {
            self.size
        } else {
            default
        }
    }

    pub fn line_height_or_default(&self) -> f32 {
        if self.line_height > 0.0 {
            self.line_height
        } else {
            crate::text::DEFAULT_LINE_HEIGHT
        }
    }
}

/// Local transform: scale about the center, then translate.
///
/// Applies to the node's own bounds only; children keep their resolved layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, bounds: BoundingBox) -> BoundingBox {
        let mut out = bounds;
        if self.scale_x != 1.0 || self.scale_y != 1.0 {
            let center_x = bounds.x + bounds.width / 2.0;
            let center_y = bounds.y + bounds.height / 2.0;
            out.width *= self.scale_x;
            out.height *= self.scale_y;
            out.x = center_x - out.width / 2.0;
            out.y = center_y - out.height / 2.0;
        }
        out.x += self.translate_x;
        out.y += self.translate_y;
        out
    }
}

/// Everything a node declares about its size, arrangement and look.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub padding: Spacing,
    pub margin: Spacing,
    /// Main axis for containers that arrange children.
    pub direction: LayoutDirection,
    pub justify: Justify,
    pub align: Align,
    pub gap: f32,
    pub grow: f32,
    pub shrink: f32,
    pub position: Position,
    /// Paint order among absolute siblings. Higher values are drawn above lower values.
    pub z_index: i16,
    pub opacity: f32,
    pub transform: Transform,
    pub visible: bool,
    pub background: Fill,
    pub border: Border,
    pub shadow: Option<Shadow>,
    pub font: Font,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            padding: Spacing::default(),
            margin: Spacing::default(),
            direction: LayoutDirection::default(),
            justify: Justify::default(),
            align: Align::default(),
            gap: 0.0,
            grow: 0.0,
            shrink: 0.0,
            position: Position::Flow,
            z_index: 0,
            opacity: 1.0,
            transform: Transform::default(),
            visible: true,
            background: Fill::None,
            border: Border::default(),
            shadow: None,
            font: Font::default(),
        }
    }
}

impl Style {
    pub fn is_absolute(&self) -> bool {
        matches!(self.position, Position::Absolute { .. })
    }

    /// Narrows a width by the style's own min/max.
    pub fn clamp_width(&self, width: f32) -> f32 {
        let width = self.max_width.map_or(width, |max| width.min(max));
        self.min_width.map_or(width, |min| width.max(min))
    }

    /// Narrows a height by the style's own min/max.
    pub fn clamp_height(&self, height: f32) -> f32 {
        let height = self.max_height.map_or(height, |max| height.min(max));
        self.min_height.map_or(height, |min| height.max(min))
    }

    pub fn clamp(&self, size: Dimensions) -> Dimensions {
        Dimensions::new(self.clamp_width(size.width), self.clamp_height(size.height))
    }

    #[inline]
    pub fn width(&mut self, width: Dimension) -> &mut Self {
        self.width = width;
        self
    }

    #[inline]
    pub fn height(&mut self, height: Dimension) -> &mut Self {
        self.height = height;
        self
    }

    /// Sets both dimensions to fixed pixel values.
    #[inline]
    pub fn size(&mut self, width: f32, height: f32) -> &mut Self {
        self.width = Dimension::Px(width);
        self.height = Dimension::Px(height);
        self
    }

    #[inline]
    pub fn min_width(&mut self, value: f32) -> &mut Self {
        self.min_width = Some(value);
        self
    }

    #[inline]
    pub fn max_width(&mut self, value: f32) -> &mut Self {
        self.max_width = Some(value);
        self
    }

    #[inline]
    pub fn min_height(&mut self, value: f32) -> &mut Self {
        self.min_height = Some(value);
        self
    }

    #[inline]
    pub fn max_height(&mut self, value: f32) -> &mut Self {
        self.max_height = Some(value);
        self
    }

    #[inline]
    pub fn padding(&mut self, padding: impl Into<Spacing>) -> &mut Self {
        self.padding = padding.into();
        self
    }

    #[inline]
    pub fn margin(&mut self, margin: impl Into<Spacing>) -> &mut Self {
        self.margin = margin.into();
        self
    }

    #[inline]
    pub fn direction(&mut self, direction: LayoutDirection) -> &mut Self {
        self.direction = direction;
        self
    }

    #[inline]
    pub fn justify(&mut self, justify: Justify) -> &mut Self {
        self.justify = justify;
        self
    }

    #[inline]
    pub fn align(&mut self, align: Align) -> &mut Self {
        self.align = align;
        self
    }

    /// Sets the spacing between child elements.
    #[inline]
    pub fn gap(&mut self, gap: f32) -> &mut Self {
        self.gap = gap;
        self
    }

    #[inline]
    pub fn grow(&mut self, grow: f32) -> &mut Self {
        self.grow = grow;
        self
    }

    #[inline]
    pub fn shrink(&mut self, shrink: f32) -> &mut Self {
        self.shrink = shrink;
        self
    }

    /// Takes the node out of flow and places it at `(x, y)`.
    #[inline]
    pub fn absolute(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = Position::Absolute { x, y };
        self
    }

    #[inline]
    pub fn z_index(&mut self, z_index: i16) -> &mut Self {
        self.z_index = z_index;
        self
    }

    #[inline]
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) -> &mut Self {
        self.transform.scale_x = x;
        self.transform.scale_y = y;
        self
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.transform.translate_x = x;
        self.transform.translate_y = y;
        self
    }

    #[inline]
    pub fn visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub fn background(&mut self, color: impl Into<Color>) -> &mut Self {
        self.background = Fill::Solid(color.into());
        self
    }

    #[inline]
    pub fn gradient(&mut self, gradient: Gradient) -> &mut Self {
        self.background = Fill::Gradient(gradient);
        self
    }

    #[inline]
    pub fn border(&mut self, width: f32, color: impl Into<Color>) -> &mut Self {
        self.border.width = width;
        self.border.color = color.into();
        self
    }

    #[inline]
    pub fn radius(&mut self, radius: f32) -> &mut Self {
        self.border.radius = radius;
        self
    }

    #[inline]
    pub fn shadow(&mut self, shadow: Shadow) -> &mut Self {
        self.shadow = Some(shadow);
        self
    }

    #[inline]
    pub fn font_size(&mut self, size: f32) -> &mut Self {
        self.font.size = size;
        self
    }

    #[inline]
    pub fn font_color(&mut self, color: impl Into<Color>) -> &mut Self {
        self.font.color = Some(color.into());
        self
    }

    #[inline]
    pub fn bold(&mut self) -> &mut Self {
        self.font.bold = true;
        self
    }

    #[inline]
    pub fn italic(&mut self) -> &mut Self {
        self.font.italic = true;
        self
    }

    #[inline]
    pub fn line_height(&mut self, multiplier: f32) -> &mut Self {
        self.font.line_height = multiplier;
        self
    }
}
