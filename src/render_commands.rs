#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::elements::{GradientKind, GradientStop};
use crate::math::{BoundingBox, Vector2};

/// Which of the two generation passes a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pass {
    Main,
    /// Modals, open dropdown menus and tab groups, painted above everything
    /// from the main pass.
    Overlay,
}

/// Defines individual corner radii for an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CornerRadii {
    /// The radius for the top-left corner.
    pub top_left: f32,
    /// The radius for the top-right corner.
    pub top_right: f32,
    /// The radius for the bottom-left corner.
    pub bottom_left: f32,
    /// The radius for the bottom-right corner.
    pub bottom_right: f32,
}

impl CornerRadii {
    pub fn all(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_left: radius,
            bottom_right: radius,
        }
    }

    pub fn is_rounded(&self) -> bool {
        self.top_left > 0.0 || self.top_right > 0.0 || self.bottom_left > 0.0 || self.bottom_right > 0.0
    }
}

/// Represents a rectangle with a specified color and corner radii.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    /// The fill color of the rectangle, opacity already applied.
    pub color: Color,
    /// The corner radii for rounded edges.
    pub corner_radii: CornerRadii,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gradient {
    pub kind: GradientKind,
    /// Degrees; only read for linear gradients.
    pub angle: f32,
    /// At most eight stops.
    pub stops: Vec<GradientStop>,
    pub corner_radii: CornerRadii,
}

/// Represents a border with a specified color, width, and corner radii.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Border {
    /// The border color.
    pub color: Color,
    /// The corner radii for rounded border edges.
    pub corner_radii: CornerRadii,
    /// Stroke width, the same on every side.
    pub width: f32,
}

/// A drop shadow. The bounding box already includes offset and spread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shadow {
    pub color: Color,
    pub offset: Vector2,
    pub blur_radius: f32,
    pub spread_radius: f32,
    pub corner_radii: CornerRadii,
}

/// Represents a text element with styling attributes.
///
/// The bounding box origin is the top-left corner of the first line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Text {
    /// The text content.
    pub text: String,
    /// The color of the text.
    pub color: Color,
    /// The font size.
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    pub from: Vector2,
    pub to: Vector2,
    pub width: f32,
    pub color: Color,
}

/// Represents an image with defined dimensions and data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Image {
    /// Source handed over by the tree; resolving it is up to the backend.
    pub source: String,
    /// Effective opacity at the time the image was emitted.
    pub opacity: f32,
    /// The corner radii for rounded border edges.
    pub corner_radii: CornerRadii,
}

/// Marker for a host-defined kind whose painter emitted nothing of its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Custom {
    pub kind: u32,
    /// The background color of the custom element.
    pub background_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RenderCommandConfig {
    BeginPass(Pass),
    EndPass(Pass),
    Rectangle(Rectangle),
    Gradient(Gradient),
    Border(Border),
    Shadow(Shadow),
    Text(Text),
    Line(Line),
    Image(Image),
    /// Clip everything up to the matching `ScissorEnd` to the bounding box.
    ScissorStart(),
    ScissorEnd(),
    /// Effective opacity for the commands that follow.
    SetOpacity(f32),
    /// Restores the opacity in effect before the last `SetOpacity`.
    PopOpacity,
    Custom(Custom),
}

/// Represents a render command for drawing an element on the screen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderCommand {
    /// The bounding box defining the area occupied by the element.
    pub bounding_box: BoundingBox,
    /// The specific configuration for rendering this command.
    pub config: RenderCommandConfig,
    /// Caller-facing id of the node that emitted the command; 0 for pass markers.
    pub id: u32,
}

impl RenderCommand {
    pub fn new(id: u32, bounding_box: BoundingBox, config: RenderCommandConfig) -> Self {
        Self {
            bounding_box,
            config,
            id,
        }
    }

    pub fn is_pass_marker(&self) -> bool {
        matches!(
            self.config,
            RenderCommandConfig::BeginPass(_) | RenderCommandConfig::EndPass(_)
        )
    }
}

/// Ordered, append-only list of commands handed to a backend.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandBuffer {
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderCommand> {
        self.commands.iter()
    }

    pub fn as_slice(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Hands every command to the caller and leaves the buffer empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, RenderCommand> {
        self.commands.drain(..)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Commands emitted inside the given pass, markers excluded.
    pub fn pass(&self, pass: Pass) -> impl Iterator<Item = &RenderCommand> + '_ {
        let mut inside = false;
        self.commands.iter().filter(move |command| match command.config {
            RenderCommandConfig::BeginPass(p) => {
                inside = p == pass;
                false
            }
            RenderCommandConfig::EndPass(_) => {
                inside = false;
                false
            }
            _ => inside,
        })
    }
}

impl IntoIterator for CommandBuffer {
    type Item = RenderCommand;
    type IntoIter = std::vec::IntoIter<RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a RenderCommand;
    type IntoIter = std::slice::Iter<'a, RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: u32) -> RenderCommand {
        RenderCommand::new(
            id,
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            RenderCommandConfig::Rectangle(Rectangle {
                color: Color::BLACK,
                corner_radii: CornerRadii::default(),
            }),
        )
    }

    fn marker(config: RenderCommandConfig) -> RenderCommand {
        RenderCommand::new(0, BoundingBox::default(), config)
    }

    #[test]
    fn drain_empties_in_order() {
        let mut buffer = CommandBuffer::new();
        buffer.push(rect(1));
        buffer.push(rect(2));
        let ids: Vec<u32> = buffer.drain().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn pass_filter_skips_markers() {
        let mut buffer = CommandBuffer::new();
        buffer.push(marker(RenderCommandConfig::BeginPass(Pass::Main)));
        buffer.push(rect(1));
        buffer.push(marker(RenderCommandConfig::EndPass(Pass::Main)));
        buffer.push(marker(RenderCommandConfig::BeginPass(Pass::Overlay)));
        buffer.push(rect(2));
        buffer.push(rect(3));
        buffer.push(marker(RenderCommandConfig::EndPass(Pass::Overlay)));

        let main: Vec<u32> = buffer.pass(Pass::Main).map(|c| c.id).collect();
        let overlay: Vec<u32> = buffer.pass(Pass::Overlay).map(|c| c.id).collect();
        assert_eq!(main, vec![1]);
        assert_eq!(overlay, vec![2, 3]);
        assert!(buffer.iter().next().is_some_and(|c| c.is_pass_marker()));
    }

    #[test]
    fn corner_radii_all() {
        assert!(CornerRadii::all(4.0).is_rounded());
        assert!(!CornerRadii::default().is_rounded());
    }
}
