//! Two-dimensional grid sizing for table → section → row → cell subtrees.
//!
//! One width per column and one height per row, shared by every cell in that
//! column or row across head, body and foot. Sections, rows and cells are
//! positioned relative to the table's own origin.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::engine::{LayoutCx, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use crate::math::{Constraint, Dimensions};
use crate::node::{ComponentKind, NodeId};
use crate::strategy::Frame;
use crate::text::DEFAULT_FONT_SIZE;

// ============================================================================
// Constants
// ============================================================================

const MIN_COLUMN_WIDTH: f32 = 30.0;
const EMPTY_CELL_WIDTH: f32 = 50.0;
const EMPTY_CELL_HEIGHT: f32 = 24.0;
const EMPTY_ROW_HEIGHT: f32 = 30.0;
const CELL_LINE_HEIGHT: f32 = 1.5;

pub(crate) const DEFAULT_BORDER_COLOR: Color = Color::rgb(200.0, 200.0, 200.0);

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableStyle {
    /// Inset of cell content on every side, in pixels.
    pub cell_padding: f32,
    pub border_width: f32,
    /// `None` draws light gray grid lines.
    pub border_color: Option<Color>,
    pub show_borders: bool,
    /// Spread leftover width evenly over the columns.
    pub fill_width: bool,
    /// Background of header cells that set none themselves.
    pub header_background: Option<Color>,
    /// Alternate `even_row_background` / `odd_row_background` on body rows.
    pub striped_rows: bool,
    pub even_row_background: Color,
    pub odd_row_background: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            cell_padding: 8.0,
            border_width: 1.0,
            border_color: None,
            show_borders: true,
            fill_width: true,
            header_background: Some(Color::rgb(240.0, 240.0, 240.0)),
            striped_rows: false,
            even_row_background: Color::WHITE,
            odd_row_background: Color::rgb(249.0, 249.0, 249.0),
        }
    }
}

impl TableStyle {
    /// Border width that takes up room in the grid.
    pub fn effective_border(&self) -> f32 {
        if self.show_borders {
            self.border_width.max(0.0)
        } else {
            0.0
        }
    }
}

/// Per-column sizing hints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnDef {
    /// Starting width; wider content still grows the column.
    pub width: Option<f32>,
    pub min_width: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellSpan {
    pub colspan: u32,
    pub rowspan: u32,
}

impl Default for CellSpan {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
        }
    }
}

impl CellSpan {
    pub fn new(colspan: u32, rowspan: u32) -> Self {
        Self { colspan, rowspan }
    }

    /// Zero spans count as one.
    pub(crate) fn normalized(self) -> Self {
        Self {
            colspan: self.colspan.max(1),
            rowspan: self.rowspan.max(1),
        }
    }
}

/// Table configuration plus the geometry cached by the last layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableState {
    pub style: TableStyle,
    pub columns: Vec<ColumnDef>,
    pub(crate) column_widths: Vec<f32>,
    pub(crate) row_heights: Vec<f32>,
    pub(crate) header_rows: usize,
    pub(crate) total: Dimensions,
}

impl TableState {
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// Rows that came from table heads.
    pub fn header_row_count(&self) -> usize {
        self.header_rows
    }

    /// Grid size including borders, as of the last pass.
    pub fn total_size(&self) -> Dimensions {
        self.total
    }
}

// ============================================================================
// Grid collection
// ============================================================================

struct RowRef {
    id: NodeId,
    /// `None` for rows placed directly under the table.
    section: Option<NodeId>,
    cells: Vec<NodeId>,
}

struct Grid {
    rows: Vec<RowRef>,
    columns: usize,
    header_rows: usize,
}

struct Sizing {
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
    total: Dimensions,
}

fn visible_children(cx: &LayoutCx<'_>, id: NodeId, pred: impl Fn(ComponentKind) -> bool) -> Vec<NodeId> {
    cx.node(id)
        .children()
        .iter()
        .copied()
        .filter(|&child| {
            let node = cx.node(child);
            node.style.visible && pred(node.kind)
        })
        .collect()
}

fn collect_grid(cx: &LayoutCx<'_>, table: NodeId) -> Grid {
    let mut rows = Vec::new();
    let mut header_rows = 0;
    for child in visible_children(cx, table, |k| k.is_table_section() || k == ComponentKind::TableRow) {
        let kind = cx.node(child).kind;
        if kind == ComponentKind::TableRow {
            rows.push(RowRef {
                id: child,
                section: None,
                cells: visible_children(cx, child, ComponentKind::is_table_cell),
            });
            continue;
        }
        for row in visible_children(cx, child, |k| k == ComponentKind::TableRow) {
            if kind == ComponentKind::TableHead {
                header_rows += 1;
            }
            rows.push(RowRef {
                id: row,
                section: Some(child),
                cells: visible_children(cx, row, ComponentKind::is_table_cell),
            });
        }
    }

    let columns = rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|&cell| cx.node(cell).cell_span().colspan as usize)
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0);

    Grid {
        rows,
        columns,
        header_rows,
    }
}

// ============================================================================
// Measurement
// ============================================================================

fn cell_content_width(cx: &mut LayoutCx<'_>, cell: NodeId) -> f32 {
    let node = cx.node(cell);
    let padding = node.style.padding;
    let font = node.style.font.size_or(DEFAULT_FONT_SIZE);
    let text = node.text.clone().filter(|t| !t.is_empty());
    let children: Vec<NodeId> = cx.flow_children(cell);

    let mut width = match text {
        Some(text) => cx.measure_text(&text, font, CELL_LINE_HEIGHT, f32::INFINITY).width,
        None => 0.0,
    };
    for child in children {
        width = width.max(cx.intrinsic_size(child, Constraint::unbounded()).width);
    }
    width += padding.horizontal_total();
    if width > 0.0 {
        width
    } else {
        EMPTY_CELL_WIDTH
    }
}

fn cell_content_height(cx: &mut LayoutCx<'_>, cell: NodeId) -> f32 {
    let node = cx.node(cell);
    let padding = node.style.padding;
    let font = node.style.font.size_or(DEFAULT_FONT_SIZE);
    let has_text = node.text.as_deref().is_some_and(|t| !t.is_empty());
    let children: Vec<NodeId> = cx.flow_children(cell);

    let mut height = if has_text { font * CELL_LINE_HEIGHT } else { 0.0 };
    for child in children {
        height = height.max(cx.intrinsic_size(child, Constraint::unbounded()).height);
    }
    height += padding.vertical_total();
    if height > 0.0 {
        height
    } else {
        EMPTY_CELL_HEIGHT
    }
}

fn compute_sizing(cx: &mut LayoutCx<'_>, table: NodeId, grid: &Grid, available_width: f32) -> Sizing {
    let (style, columns) = match cx.node(table).table_state() {
        Some(state) => (state.style, state.columns.clone()),
        None => (TableStyle::default(), Vec::new()),
    };
    let border = style.effective_border();
    let cell_padding = style.cell_padding;
    let column_count = grid.columns;
    let row_count = grid.rows.len();

    // Columns: explicit starting widths, content, then minimums.
    let mut column_widths: Vec<f32> = (0..column_count)
        .map(|c| columns.get(c).and_then(|def| def.width).unwrap_or(0.0))
        .collect();
    for row in &grid.rows {
        let mut column = 0usize;
        for &cell in &row.cells {
            let span = cx.node(cell).cell_span();
            if span.colspan == 1 && column < column_count {
                let wanted = cell_content_width(cx, cell) + cell_padding * 2.0;
                column_widths[column] = column_widths[column].max(wanted);
            }
            column += span.colspan as usize;
        }
    }
    for (c, width) in column_widths.iter_mut().enumerate() {
        if let Some(min) = columns.get(c).and_then(|def| def.min_width) {
            *width = width.max(min);
        }
        *width = width.max(MIN_COLUMN_WIDTH);
    }

    let mut total_width = column_widths.iter().sum::<f32>() + border * (column_count + 1) as f32;
    if style.fill_width && available_width.is_finite() && total_width < available_width {
        let extra = (available_width - total_width) / column_count as f32;
        for width in &mut column_widths {
            *width += extra;
        }
        total_width = available_width;
    }

    // Rows.
    let mut row_heights = Vec::with_capacity(row_count);
    for row in &grid.rows {
        let mut height = 0.0f32;
        for &cell in &row.cells {
            if cx.node(cell).cell_span().rowspan == 1 {
                height = height.max(cell_content_height(cx, cell) + cell_padding * 2.0);
            }
        }
        row_heights.push(if height > 0.0 { height } else { EMPTY_ROW_HEIGHT });
    }
    let total_height = row_heights.iter().sum::<f32>() + border * (row_count + 1) as f32;

    Sizing {
        column_widths,
        row_heights,
        total: Dimensions::new(total_width, total_height),
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// Content size of the grid. `fill_width` is left to `arrange`, against the
/// width the parent actually assigns.
pub(crate) fn measure(cx: &mut LayoutCx<'_>, id: NodeId, _constraint: Constraint) -> Dimensions {
    let grid = collect_grid(cx, id);
    if grid.rows.is_empty() || grid.columns == 0 {
        return Dimensions::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    }
    compute_sizing(cx, id, &grid, f32::INFINITY).total
}

/// Sizes the grid, positions every section, row and cell relative to the
/// table, and replaces the cached column/row arrays.
pub(crate) fn arrange(cx: &mut LayoutCx<'_>, id: NodeId, frame: Frame) -> Dimensions {
    let grid = collect_grid(cx, id);
    if grid.rows.is_empty() || grid.columns == 0 {
        let children = cx.node(id).children().to_vec();
        for child in children {
            cx.hide_subtree(child);
        }
        store_state(cx, id, Vec::new(), Vec::new(), 0, Dimensions::zero());
        return Dimensions::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    }

    let sizing = compute_sizing(cx, id, &grid, frame.size.width);
    let (border, cell_padding) = match cx.node(id).table_state() {
        Some(state) => (state.style.effective_border(), state.style.cell_padding),
        None => (TableStyle::default().effective_border(), TableStyle::default().cell_padding),
    };
    let total = sizing.total;
    let column_count = sizing.column_widths.len();
    let row_count = sizing.row_heights.len();

    // Anything under the table that is not part of the grid collapses.
    let children = cx.node(id).children().to_vec();
    for child in children {
        let kind = cx.node(child).kind;
        if !(kind.is_table_section() || kind == ComponentKind::TableRow) {
            cx.hide_subtree(child);
        }
    }

    let mut y = border;
    let mut section_start: Option<(NodeId, f32)> = None;
    for (row_index, row) in grid.rows.iter().enumerate() {
        match (section_start, row.section) {
            (Some((open, _)), Some(section)) if open == section => {}
            (previous, section) => {
                if let Some((open, start)) = previous {
                    cx.store_layout(open, 0.0, start, Dimensions::new(total.width, y - start));
                }
                section_start = section.map(|s| (s, y));
            }
        }

        let row_height = sizing.row_heights[row_index];
        cx.store_layout(row.id, 0.0, y, Dimensions::new(total.width, row_height));

        let mut x = border;
        let mut column = 0usize;
        for &cell in &row.cells {
            let span = cx.node(cell).cell_span();
            let colspan = span.colspan as usize;
            let rowspan = span.rowspan as usize;

            let width = sizing.column_widths[column.min(column_count)..(column + colspan).min(column_count)]
                .iter()
                .sum::<f32>()
                + border * (colspan - 1) as f32;
            let height = sizing.row_heights[row_index..(row_index + rowspan).min(row_count)]
                .iter()
                .sum::<f32>()
                + border * (rowspan - 1) as f32;
            let size = Dimensions::new(width, height);

            cx.store_layout(cell, x, y, size);
            layout_cell_children(cx, cell, size, cell_padding);
            x += width + border;
            column += colspan;
        }

        cx.layout_out_of_flow(row.id, Dimensions::new(total.width, row_height));
        // Cells beyond the visible ones, or hidden, still need a layout.
        let stray = cx.node(row.id).children().to_vec();
        for child in stray {
            let node = cx.node(child);
            let out_of_flow = node.style.is_absolute() || node.kind == ComponentKind::Modal;
            if !row.cells.contains(&child) && !(node.style.visible && out_of_flow) {
                cx.hide_subtree(child);
            }
        }

        y += row_height + border;
    }
    if let Some((open, start)) = section_start {
        cx.store_layout(open, 0.0, start, Dimensions::new(total.width, y - start));
    }

    // Sections or rows that held nothing visible.
    let children = cx.node(id).children().to_vec();
    for child in children {
        if !cx.node(child).layout().valid {
            cx.hide_subtree(child);
        }
    }

    store_state(
        cx,
        id,
        sizing.column_widths,
        sizing.row_heights,
        grid.header_rows,
        total,
    );

    let width = if frame.auto_width { total.width } else { frame.size.width };
    let height = if frame.auto_height { total.height } else { frame.size.height };
    Dimensions::new(width, height)
}

/// Stacks cell children inside the cell's content box, relative to the cell.
/// Absolute and modal children go through the out-of-flow pass instead.
fn layout_cell_children(cx: &mut LayoutCx<'_>, cell: NodeId, size: Dimensions, cell_padding: f32) {
    let padding = cx.node(cell).style.padding;
    let left = cell_padding + padding.left;
    let top = cell_padding + padding.top;
    let content = Constraint::loose(
        (size.width - left - cell_padding - padding.right).max(0.0),
        (size.height - top - cell_padding - padding.bottom).max(0.0),
    );
    cx.layout_out_of_flow(
        cell,
        Dimensions::new(
            (size.width - cell_padding * 2.0).max(0.0),
            (size.height - cell_padding * 2.0).max(0.0),
        ),
    );
    let mut y = top;
    for child in cx.flow_children(cell) {
        let wanted = content.clamp(cx.intrinsic_size(child, content));
        let laid = cx.layout_node(child, Constraint::tight(wanted.width, wanted.height));
        cx.set_position(child, left, y);
        y += laid.height;
    }
}

fn store_state(
    cx: &mut LayoutCx<'_>,
    id: NodeId,
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
    header_rows: usize,
    total: Dimensions,
) {
    if let crate::node::NodeState::Table(state) = &mut cx.node_mut(id).state {
        state.column_widths = column_widths;
        state.row_heights = row_heights;
        state.header_rows = header_rows;
        state.total = total;
    }
}
