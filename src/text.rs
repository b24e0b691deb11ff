use crate::math::Dimensions;

/// Font size used when neither the node nor its kind picks one.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Line height multiplier used when the font leaves it unset.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.5;
/// Fraction of the font size one character takes in the fallback estimate.
pub const CHAR_WIDTH_RATIO: f32 = 0.5;

/// External text measurement: `(text, font_size, max_width) -> (width, height)`.
///
/// `max_width` is `f32::INFINITY` when the text may take a single line.
pub type MeasureTextFn = Box<dyn Fn(&str, f32, f32) -> Dimensions + Send + Sync>;

/// Single-line width estimate from the character count.
pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
}

/// Fixed-ratio estimate used when no measurement function is installed.
///
/// Text wider than a finite `max_width` wraps onto `ceil(width / max_width)` lines.
pub fn estimate_text(text: &str, font_size: f32, line_height: f32, max_width: f32) -> Dimensions {
    let width = estimate_width(text, font_size);
    let line = font_size * line_height;
    if max_width.is_finite() && max_width > 0.0 && width > max_width {
        let lines = (width / max_width).ceil();
        Dimensions::new(max_width, lines * line)
    } else {
        Dimensions::new(width, line)
    }
}

/// Measures through the installed function, or the estimate without one.
pub(crate) fn measure(
    measure_fn: Option<&MeasureTextFn>,
    text: &str,
    font_size: f32,
    line_height: f32,
    max_width: f32,
) -> Dimensions {
    match measure_fn {
        Some(f) => {
            let measured = f(text, font_size, max_width);
            if measured.width.is_finite() && measured.height.is_finite() {
                measured
            } else {
                estimate_text(text, font_size, line_height, max_width)
            }
        }
        None => estimate_text(text, font_size, line_height, max_width),
    }
}
