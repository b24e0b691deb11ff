//! Per-kind paint: turns one node and its painted bounds into commands.

use crate::color::Color;
use crate::elements::{Fill, Style};
use crate::engine::{self, CHECKBOX_BOX, CHECKBOX_INSET, CHECKBOX_LABEL_GAP, CONTROL_FONT_SIZE};
use crate::expr::Evaluator;
use crate::flex::MODAL_TITLE_BAR_HEIGHT;
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::node::{ComponentKind, Node, NodeState};
use crate::render_commands::{
    Border, CommandBuffer, CornerRadii, Custom, Gradient, Image, Line, Rectangle,
    RenderCommand, RenderCommandConfig, Shadow, Text,
};
use crate::table::{TableStyle, DEFAULT_BORDER_COLOR};
use crate::text::{self, MeasureTextFn, DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT};

// ============================================================================
// Constants
// ============================================================================

const SHADOW_COLOR: Color = Color::hex_rgba(0x00000080);
const MAX_GRADIENT_STOPS: usize = 8;
const MARK_BACKGROUND: Color = Color::hex_rgba(0xFFFF00FF);
const HOVER_BRIGHTEN: f32 = 0.3;

const INPUT_TEXT_INSET: f32 = 8.0;
const PLACEHOLDER_TEXT_COLOR: Color = Color::hex_rgba(0x9CA3AFFF);

const CHECKBOX_BOX_RATIO: f32 = 0.6;
const CHECKBOX_BORDER_WIDTH: f32 = 2.0;
const CHECKBOX_BORDER_COLOR: Color = Color::rgb(128.0, 128.0, 128.0);
const CHECK_COLOR: Color = Color::hex_rgba(0x22C55EFF);
const CHECK_POINTS: [(f32, f32); 3] = [(0.2, 0.5), (0.4, 0.7), (0.8, 0.3)];

const DROPDOWN_TEXT_INSET: f32 = 12.0;
const DROPDOWN_ARROW_OFFSET: f32 = 20.0;
const DROPDOWN_ARROW_SIZE: f32 = 6.0;
const DROPDOWN_ARROW_COLOR: Color = Color::hex_rgba(0x6B7280FF);
const MENU_OPTION_HEIGHT: f32 = 35.0;
const MENU_MAX_HEIGHT: f32 = 200.0;
const MENU_SHADOW_OFFSET: f32 = 2.0;
const MENU_SHADOW_COLOR: Color = Color::rgba(50.0, 50.0, 50.0, 100.0);
const MENU_BORDER_COLOR: Color = Color::hex_rgba(0xD1D5DBFF);
const MENU_HIGHLIGHT: Color = Color::hex_rgba(0xE0E0E0FF);
const MENU_TEXT_INSET: f32 = 10.0;

const IMAGE_PLACEHOLDER: Color = Color::hex_rgba(0xCCCCCCFF);
const IMAGE_LABEL: &str = "Image";
const IMAGE_LABEL_SIZE: f32 = 12.0;
const IMAGE_LABEL_COLOR: Color = Color::hex_rgba(0x666666FF);
const IMAGE_LABEL_MIN_HEIGHT: f32 = 20.0;

const RULE_COLOR: Color = Color::hex_rgba(0xE5E7EBFF);

const BACKDROP_COLOR: Color = Color::hex_rgba(0x00000080);
const TITLE_BAR_COLOR: Color = Color::hex_rgba(0x3D3D3DFF);
const TITLE_INSET_X: f32 = 16.0;
const TITLE_INSET_Y: f32 = 10.0;

// ============================================================================
// Painter
// ============================================================================

/// Appends commands for one node, premultiplying colors by the opacity in
/// effect.
pub(crate) struct Painter<'a> {
    out: &'a mut CommandBuffer,
    id: u32,
    opacity: f32,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(out: &'a mut CommandBuffer, id: u32, opacity: f32) -> Self {
        Self { out, id, opacity }
    }

    #[inline]
    fn tint(&self, color: Color) -> Color {
        color.with_opacity(self.opacity)
    }

    fn push(&mut self, bounding_box: BoundingBox, config: RenderCommandConfig) {
        self.out.push(RenderCommand::new(self.id, bounding_box, config));
    }

    pub fn rect(&mut self, bounds: BoundingBox, color: Color, radius: f32) {
        let color = self.tint(color);
        self.push(
            bounds,
            RenderCommandConfig::Rectangle(Rectangle {
                color,
                corner_radii: CornerRadii::all(radius),
            }),
        );
    }

    pub fn border(&mut self, bounds: BoundingBox, color: Color, width: f32, radius: f32) {
        let color = self.tint(color);
        self.push(
            bounds,
            RenderCommandConfig::Border(Border {
                color,
                corner_radii: CornerRadii::all(radius),
                width,
            }),
        );
    }

    pub fn line(&mut self, from: Vector2, to: Vector2, width: f32, color: Color) {
        let color = self.tint(color);
        let bounds = BoundingBox::new(
            from.x.min(to.x),
            from.y.min(to.y),
            (to.x - from.x).abs(),
            (to.y - from.y).abs(),
        );
        self.push(bounds, RenderCommandConfig::Line(Line { from, to, width, color }));
    }

    pub fn text(&mut self, bounds: BoundingBox, text: impl Into<String>, style: TextStyle) {
        let color = self.tint(style.color);
        self.push(
            bounds,
            RenderCommandConfig::Text(Text {
                text: text.into(),
                color,
                font_size: style.font_size,
                bold: style.bold,
                italic: style.italic,
            }),
        );
    }

    pub(crate) fn scissor_start(&mut self, bounds: BoundingBox) {
        self.push(bounds, RenderCommandConfig::ScissorStart());
    }

    pub(crate) fn scissor_end(&mut self, bounds: BoundingBox) {
        self.push(bounds, RenderCommandConfig::ScissorEnd());
    }
}

/// Font settings for a single text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextStyle {
    pub color: Color,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub fn new(color: Color, font_size: f32) -> Self {
        Self {
            color,
            font_size,
            bold: false,
            italic: false,
        }
    }

    fn of(style: &Style, default_color: Color, font_size: f32) -> Self {
        Self {
            color: style.font.color.unwrap_or(default_color),
            font_size,
            bold: style.font.bold,
            italic: style.font.italic,
        }
    }
}

/// Paints host-defined kinds.
///
/// Called with the node's painted bounds and the opacity in effect; whatever
/// is pushed to the buffer lands in order with the rest of the pass.
pub trait CustomPainter: Send + Sync {
    fn paint(&self, node: &Node, bounds: BoundingBox, opacity: f32, out: &mut CommandBuffer);
}

impl<F> CustomPainter for F
where
    F: Fn(&Node, BoundingBox, f32, &mut CommandBuffer) + Send + Sync,
{
    fn paint(&self, node: &Node, bounds: BoundingBox, opacity: f32, out: &mut CommandBuffer) {
        self(node, bounds, opacity, out)
    }
}

/// Read-only inputs an emitter may consult.
#[derive(Clone, Copy)]
pub(crate) struct EmitCx<'a> {
    pub(crate) measure_text_fn: Option<&'a MeasureTextFn>,
    pub(crate) evaluator: Option<&'a dyn Evaluator>,
    /// Menus and other overlay content are painted: always in the overlay
    /// pass, and inline for a node the full overlay list pushed back.
    pub(crate) overlay_content: bool,
    pub(crate) hovered: bool,
}

impl EmitCx<'_> {
    fn measure(&self, text: &str, font_size: f32) -> Dimensions {
        text::measure(self.measure_text_fn, text, font_size, DEFAULT_LINE_HEIGHT, f32::INFINITY)
    }

    /// The evaluated expression, else the static text.
    pub(crate) fn display_text(&self, node: &Node) -> Option<String> {
        node.text_expression
            .as_deref()
            .and_then(|expr| self.evaluator?.eval_text(expr, node.scope))
            .or_else(|| node.text.clone())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Kinds that need nothing beyond their own node. Cells, tabs, modals and
/// custom kinds take extra context and are called directly by the walk.
pub(crate) fn emit(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox, skip_background: bool) {
    use ComponentKind::*;

    match node.kind {
        Text | Strong | Em | Small | Mark | CodeInline => text_leaf(p, cx, node, bounds),
        Button => button(p, cx, node, bounds),
        Input => input(p, cx, node, bounds),
        Checkbox => checkbox(p, cx, node, bounds),
        Dropdown => dropdown(p, cx, node, bounds),
        Image => image(p, node, bounds),
        Table => table(p, node, bounds),
        HorizontalRule => rule(p, node, bounds),
        Heading | Paragraph | Blockquote | CodeBlock | ListItem | Link => text_block(p, cx, node, bounds),
        _ if skip_background => container_with(p, &node.style, bounds, &Fill::None),
        _ => container(p, &node.style, bounds),
    }
}

// ============================================================================
// Containers
// ============================================================================

pub(crate) fn container(p: &mut Painter<'_>, style: &Style, bounds: BoundingBox) {
    container_with(p, style, bounds, &style.background);
}

/// Shadow, `background`, then border.
fn container_with(p: &mut Painter<'_>, style: &Style, bounds: BoundingBox, background: &Fill) {
    let radius = style.border.radius;

    if let Some(shadow) = style.shadow.filter(|s| !s.inset) {
        let color = p.tint(shadow.color.unwrap_or(SHADOW_COLOR));
        if color.is_visible() {
            let spread = shadow.spread_radius;
            let shadow_bounds = bounds
                .offset(shadow.offset_x, shadow.offset_y)
                .inset(-spread, -spread, -spread, -spread);
            p.push(
                shadow_bounds,
                RenderCommandConfig::Shadow(Shadow {
                    color,
                    offset: Vector2::new(shadow.offset_x, shadow.offset_y),
                    blur_radius: shadow.blur_radius,
                    spread_radius: spread,
                    corner_radii: CornerRadii::all(radius),
                }),
            );
        }
    }

    match background {
        Fill::None => {}
        Fill::Solid(color) => {
            if color.is_visible() {
                p.rect(bounds, *color, radius);
            }
        }
        Fill::Gradient(gradient) => {
            if !gradient.stops.is_empty() {
                let stops = gradient
                    .stops
                    .iter()
                    .take(MAX_GRADIENT_STOPS)
                    .map(|stop| crate::elements::GradientStop {
                        color: p.tint(stop.color),
                        ..*stop
                    })
                    .collect();
                p.push(
                    bounds,
                    RenderCommandConfig::Gradient(Gradient {
                        kind: gradient.kind,
                        angle: gradient.angle,
                        stops,
                        corner_radii: CornerRadii::all(radius),
                    }),
                );
            }
        }
    }

    if style.border.width > 0.0 && style.border.color.is_visible() {
        p.border(bounds, style.border.color, style.border.width, radius);
    }
}

fn hovered_background(cx: &EmitCx<'_>, node: &Node) -> Fill {
    match node.style.background {
        Fill::Solid(color) if cx.hovered && !node.disabled => Fill::Solid(color.brighten(HOVER_BRIGHTEN)),
        ref fill => fill.clone(),
    }
}

/// Box of `size` centered in `bounds`.
fn centered(bounds: BoundingBox, size: Dimensions) -> BoundingBox {
    BoundingBox::new(
        bounds.x + (bounds.width - size.width) / 2.0,
        bounds.y + (bounds.height - size.height) / 2.0,
        size.width,
        size.height,
    )
}

// ============================================================================
// Text
// ============================================================================

fn text_leaf(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    if node.kind == ComponentKind::Mark && node.style.background == Fill::None {
        p.rect(bounds, MARK_BACKGROUND, node.style.border.radius);
    }
    content_text(p, cx, node, bounds);
}

fn text_block(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    if node.children().is_empty() {
        content_text(p, cx, node, bounds);
    }
}

/// The node's display text inside its padding box.
fn content_text(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    let Some(content) = cx.display_text(node).filter(|t| !t.is_empty()) else {
        return;
    };
    let padding = node.style.padding;
    let area = bounds.inset(padding.left, padding.top, padding.right, padding.bottom);
    let mut style = TextStyle::of(&node.style, Color::BLACK, engine::font_size(node));
    style.bold |= node.kind == ComponentKind::Strong;
    style.italic |= node.kind == ComponentKind::Em;
    p.text(area, content, style);
}

// ============================================================================
// Controls
// ============================================================================

fn button(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    let background = hovered_background(cx, node);
    container_with(p, &node.style, bounds, &background);

    let Some(label) = cx.display_text(node).filter(|t| !t.is_empty()) else {
        return;
    };
    let font_size = node.style.font.size_or(CONTROL_FONT_SIZE);
    let size = cx.measure(&label, font_size);
    let area = centered(bounds, Dimensions::new(size.width, font_size));
    p.text(area, label, TextStyle::of(&node.style, Color::BLACK, font_size));
}

fn input(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    let NodeState::Input(state) = &node.state else {
        return;
    };

    p.scissor_start(bounds);
    let font_size = node.style.font.size_or(CONTROL_FONT_SIZE);
    let text_x = bounds.x + INPUT_TEXT_INSET - state.scroll_x;
    let text_y = bounds.y + (bounds.height - font_size) / 2.0;
    let style = TextStyle::of(&node.style, Color::BLACK, font_size);

    if !state.value.is_empty() {
        let size = cx.measure(&state.value, font_size);
        p.text(
            BoundingBox::new(text_x, text_y, size.width, font_size),
            state.value.clone(),
            style,
        );
    } else if let Some(placeholder) = state.placeholder.as_deref().filter(|t| !t.is_empty()) {
        let size = cx.measure(placeholder, font_size);
        p.text(
            BoundingBox::new(text_x, text_y, size.width, font_size),
            placeholder,
            TextStyle {
                color: PLACEHOLDER_TEXT_COLOR,
                ..style
            },
        );
    }

    if state.focused && state.caret_visible {
        let before: String = state.value.chars().take(state.cursor).collect();
        let caret_x = text_x + cx.measure(&before, font_size).width;
        p.line(
            Vector2::new(caret_x, text_y),
            Vector2::new(caret_x, text_y + font_size),
            1.0,
            style.color,
        );
    }
    p.scissor_end(bounds);
}

fn checkbox(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    let style = &node.style;
    let size = (bounds.height * CHECKBOX_BOX_RATIO).min(CHECKBOX_BOX);
    let check_box = BoundingBox::new(
        bounds.x + CHECKBOX_INSET,
        bounds.y + (bounds.height - size) / 2.0,
        size,
        size,
    );

    let fill = style.background.solid().filter(Color::is_visible).unwrap_or(Color::WHITE);
    p.rect(check_box, fill, style.border.radius);
    let (border_width, border_color) = if style.border.width > 0.0 && style.border.color.is_visible() {
        (style.border.width, style.border.color)
    } else {
        (CHECKBOX_BORDER_WIDTH, CHECKBOX_BORDER_COLOR)
    };
    p.border(check_box, border_color, border_width, style.border.radius);

    if matches!(node.state, NodeState::Checkbox { checked: true }) {
        let color = style.font.color.unwrap_or(CHECK_COLOR);
        let point = |(fx, fy): (f32, f32)| {
            Vector2::new(check_box.x + check_box.width * fx, check_box.y + check_box.height * fy)
        };
        for pair in CHECK_POINTS.windows(2) {
            p.line(point(pair[0]), point(pair[1]), 2.0, color);
        }
    }

    if let Some(label) = cx.display_text(node).filter(|t| !t.is_empty()) {
        let font_size = style.font.size_or(DEFAULT_FONT_SIZE);
        let measured = cx.measure(&label, font_size);
        let area = BoundingBox::new(
            bounds.x + size + CHECKBOX_LABEL_GAP,
            bounds.y + (bounds.height - font_size) / 2.0,
            measured.width,
            font_size,
        );
        p.text(area, label, TextStyle::of(style, Color::BLACK, font_size));
    }
}

fn dropdown(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    let NodeState::Dropdown(state) = &node.state else {
        return;
    };
    let font_size = engine::font_size(node);
    let style = TextStyle::of(&node.style, Color::BLACK, font_size);

    let shown = match state.selected_text() {
        Some(text) => Some((text, style)),
        None => state.placeholder.as_deref().map(|text| {
            (
                text,
                TextStyle {
                    color: PLACEHOLDER_TEXT_COLOR,
                    ..style
                },
            )
        }),
    };
    if let Some((text, text_style)) = shown.filter(|(t, _)| !t.is_empty()) {
        let measured = cx.measure(text, font_size);
        let area = BoundingBox::new(
            bounds.x + DROPDOWN_TEXT_INSET,
            bounds.y + (bounds.height - font_size) / 2.0,
            measured.width,
            font_size,
        );
        p.text(area, text, text_style);
    }

    let arrow_x = bounds.x + bounds.width - DROPDOWN_ARROW_OFFSET;
    let arrow_y = bounds.y + bounds.height / 2.0;
    let half = DROPDOWN_ARROW_SIZE / 2.0;
    let tip = Vector2::new(arrow_x, arrow_y + 2.0);
    p.line(Vector2::new(arrow_x - half, arrow_y - 2.0), tip, 2.0, DROPDOWN_ARROW_COLOR);
    p.line(tip, Vector2::new(arrow_x + half, arrow_y - 2.0), 2.0, DROPDOWN_ARROW_COLOR);

    if cx.overlay_content && state.open && !state.options.is_empty() {
        dropdown_menu(p, cx, node, bounds, style);
    }
}

fn dropdown_menu(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox, style: TextStyle) {
    let NodeState::Dropdown(state) = &node.state else {
        return;
    };
    let height = (state.options.len() as f32 * MENU_OPTION_HEIGHT).min(MENU_MAX_HEIGHT);
    let menu = BoundingBox::new(bounds.x, bounds.y + bounds.height, bounds.width, height);
    let radius = node.style.border.radius;

    p.rect(menu.offset(MENU_SHADOW_OFFSET, MENU_SHADOW_OFFSET), MENU_SHADOW_COLOR, radius);
    p.rect(menu, Color::WHITE, radius);
    let border_color = if node.style.border.width > 0.0 && node.style.border.color.is_visible() {
        node.style.border.color
    } else {
        MENU_BORDER_COLOR
    };
    p.border(menu, border_color, node.style.border.width.max(1.0), radius);

    p.scissor_start(menu);
    for (index, option) in state.options.iter().enumerate() {
        let row = BoundingBox::new(
            menu.x,
            menu.y + index as f32 * MENU_OPTION_HEIGHT,
            menu.width,
            MENU_OPTION_HEIGHT,
        );
        if row.y >= menu.y + menu.height {
            break;
        }
        if state.hovered == Some(index) || state.selected == Some(index) {
            p.rect(row, MENU_HIGHLIGHT, 0.0);
        }
        let measured = cx.measure(option, style.font_size);
        let area = BoundingBox::new(
            row.x + MENU_TEXT_INSET,
            row.y + (row.height - style.font_size) / 2.0,
            measured.width,
            style.font_size,
        );
        p.text(area, option.as_str(), style);
    }
    p.scissor_end(menu);
}

fn image(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    let radius = node.style.border.radius;
    match &node.state {
        NodeState::Image { source: Some(source) } if !source.is_empty() => {
            let opacity = p.opacity;
            p.push(
                bounds,
                RenderCommandConfig::Image(Image {
                    source: source.clone(),
                    opacity,
                    corner_radii: CornerRadii::all(radius),
                }),
            );
        }
        _ => {
            p.rect(bounds, IMAGE_PLACEHOLDER, radius);
            if bounds.height > IMAGE_LABEL_MIN_HEIGHT {
                let area = BoundingBox::new(
                    bounds.x + 5.0,
                    bounds.y + bounds.height / 2.0 - 6.0,
                    text::estimate_width(IMAGE_LABEL, IMAGE_LABEL_SIZE),
                    IMAGE_LABEL_SIZE,
                );
                p.text(area, IMAGE_LABEL, TextStyle::new(IMAGE_LABEL_COLOR, IMAGE_LABEL_SIZE));
            }
        }
    }
}

// ============================================================================
// Markdown
// ============================================================================

fn rule(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox) {
    container_with(p, &node.style, bounds, &node.style.background);
    let border = node.style.border;
    let (color, width) = if border.width > 0.0 && border.color.is_visible() {
        (border.color, border.width)
    } else {
        (RULE_COLOR, 1.0)
    };
    let y = bounds.y + bounds.height / 2.0;
    p.line(
        Vector2::new(bounds.x, y),
        Vector2::new(bounds.x + bounds.width, y),
        width,
        color,
    );
}

// ============================================================================
// Tables
// ============================================================================

/// Background plus grid lines from the cached column and row arrays.
fn table(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox) {
    container(p, &node.style, bounds);
    let Some(state) = node.table_state() else {
        return;
    };
    let border = state.style.effective_border();
    if border <= 0.0 || state.column_count() == 0 {
        return;
    }
    let color = state.style.border_color.unwrap_or(DEFAULT_BORDER_COLOR);
    let total = state.total_size();
    let half = border / 2.0;

    let mut x = bounds.x + half;
    p.line(Vector2::new(x, bounds.y), Vector2::new(x, bounds.y + total.height), border, color);
    for width in state.column_widths() {
        x += width + border;
        p.line(Vector2::new(x, bounds.y), Vector2::new(x, bounds.y + total.height), border, color);
    }

    let mut y = bounds.y + half;
    p.line(Vector2::new(bounds.x, y), Vector2::new(bounds.x + total.width, y), border, color);
    for height in state.row_heights() {
        y += height + border;
        p.line(Vector2::new(bounds.x, y), Vector2::new(bounds.x + total.width, y), border, color);
    }
}

/// What a cell needs from its table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellPaint {
    pub(crate) padding: f32,
    pub(crate) header: bool,
    pub(crate) style: TableStyle,
}

pub(crate) fn cell(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox, table: CellPaint) {
    let background = match (&node.style.background, table.style.header_background) {
        (Fill::None, Some(color)) if table.header => Fill::Solid(color),
        (fill, _) => fill.clone(),
    };
    container_with(p, &node.style, bounds, &background);

    if !node.children().is_empty() {
        return;
    }
    let Some(content) = cx.display_text(node).filter(|t| !t.is_empty()) else {
        return;
    };
    let padding = node.style.padding;
    let area = bounds.inset(
        table.padding + padding.left,
        table.padding + padding.top,
        table.padding + padding.right,
        table.padding + padding.bottom,
    );
    let mut style = TextStyle::of(&node.style, Color::BLACK, engine::font_size(node));
    style.bold |= table.header;
    p.text(area, content, style);
}

/// Row background, with the alternating body color when the table stripes.
pub(crate) fn row(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox, stripe: Option<Color>) {
    match (&node.style.background, stripe) {
        (Fill::None, Some(color)) => container_with(p, &node.style, bounds, &Fill::Solid(color)),
        _ => container(p, &node.style, bounds),
    }
}

// ============================================================================
// Overlays
// ============================================================================

/// Backdrop over `viewport`, the box, and the optional title bar.
pub(crate) fn modal(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, modal_box: BoundingBox, viewport: Dimensions) {
    p.rect(
        BoundingBox::new(0.0, 0.0, viewport.width, viewport.height),
        BACKDROP_COLOR,
        0.0,
    );
    container(p, &node.style, modal_box);

    let title = node.modal_state().and_then(|s| s.title.clone()).filter(|t| !t.is_empty());
    if let Some(title) = title {
        let bar = BoundingBox::new(modal_box.x, modal_box.y, modal_box.width, MODAL_TITLE_BAR_HEIGHT);
        p.rect(bar, TITLE_BAR_COLOR, 0.0);
        let measured = cx.measure(&title, DEFAULT_FONT_SIZE);
        let area = BoundingBox::new(
            modal_box.x + TITLE_INSET_X,
            modal_box.y + TITLE_INSET_Y,
            measured.width,
            DEFAULT_FONT_SIZE,
        );
        let style = TextStyle {
            bold: true,
            ..TextStyle::new(Color::WHITE, DEFAULT_FONT_SIZE)
        };
        p.text(area, title, style);
    }
}

/// A tab in the bar; `active` is the group's active color when this tab is
/// the selected one.
pub(crate) fn tab(p: &mut Painter<'_>, cx: &EmitCx<'_>, node: &Node, bounds: BoundingBox, active: Option<Color>) {
    let background = match active {
        Some(color) => Fill::Solid(color),
        None => hovered_background(cx, node),
    };
    container_with(p, &node.style, bounds, &background);

    let Some(title) = cx.display_text(node).filter(|t| !t.is_empty()) else {
        return;
    };
    let font_size = engine::font_size(node);
    let measured = cx.measure(&title, font_size);
    let area = centered(bounds, Dimensions::new(measured.width, font_size));
    let style = TextStyle::of(&node.style, Color::WHITE, font_size);
    p.text(area, title, style);
}

/// Host-defined kind without a painter: container plus a marker command.
pub(crate) fn custom_fallback(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox, kind: u32) {
    container(p, &node.style, bounds);
    let background_color = p.tint(node.style.background.solid().unwrap_or(Color::TRANSPARENT));
    p.push(
        bounds,
        RenderCommandConfig::Custom(Custom {
            kind,
            background_color,
        }),
    );
}
