use crate::config::{Branding, MM, TableStyle};
use crate::fonts::Font;
use crate::model::LineItem;

use super::canvas::{Align, Canvas};
use super::format::{format_money, format_quantity, wrap_text};
use super::layout::{Geometry, PlacedRow, RenderState};

const CELL_PAD: f32 = 3.0 * MM;
const HEADER_LABELS: [&str; 5] = ["DÉSIGNATION", "QTÉ", "UNITÉ", "P.U. HT", "TOTAL HT"];

/// Column edges across the usable width. Edges come from cumulative shares,
/// so adjacent columns share an edge and the last edge is the right margin.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Columns {
    edges: [f32; 6],
}

impl Columns {
    pub(crate) fn new(left: f32, usable_width: f32, shares: [u32; 5]) -> Self {
        let total: u32 = shares.iter().sum::<u32>().max(1);
        let mut edges = [left; 6];
        let mut acc = 0u32;
        for (i, share) in shares.iter().enumerate() {
            acc += share;
            edges[i + 1] = left + usable_width * (acc as f32 / total as f32);
        }
        Self { edges }
    }

    pub(crate) fn left(&self, col: usize) -> f32 {
        self.edges[col]
    }

    pub(crate) fn right(&self, col: usize) -> f32 {
        self.edges[col + 1]
    }
}

/// A row whose description has been wrapped and whose height is known.
struct MeasuredRow {
    item_index: usize,
    lines: Vec<String>,
    height: f32,
}

fn measure_row(item_index: usize, item: &LineItem, style: &TableStyle) -> MeasuredRow {
    let lines = wrap_text(&item.description, style.description_chars_per_line);
    let height = style.base_row_height * lines.len().max(1) as f32;
    MeasuredRow {
        item_index,
        lines,
        height,
    }
}

enum TableState {
    /// Table header row still to place; `carry` is a row that was pushed off
    /// the previous page and goes first under the header.
    HeaderPending { carry: Option<MeasuredRow> },
    RowInProgress(usize),
    PageBreakNeeded(MeasuredRow),
    Complete,
}

fn place_row(state: &mut RenderState, row: MeasuredRow) {
    log::debug!(
        "TABLE row={} lines={} row_h={:.2} top={:.2} page={}",
        row.item_index,
        row.lines.len(),
        row.height,
        state.cursor,
        state.pages.len()
    );
    let top = state.cursor;
    state.cursor += row.height;
    state.page_mut().rows.push(PlacedRow {
        item_index: row.item_index,
        top,
        height: row.height,
        lines: row.lines,
    });
}

/// Place every item row, breaking pages and repeating the table header as needed.
pub(crate) fn place_table(items: &[LineItem], style: &TableStyle, state: &mut RenderState) {
    // Body height of a fresh continuation page, below its table header.
    let fresh_capacity =
        state.geo.content_bottom - state.geo.continuation_top - style.header_row_height;

    let mut next = TableState::HeaderPending { carry: None };
    loop {
        next = match next {
            TableState::HeaderPending { carry } => {
                let top = state.cursor;
                state.page_mut().table_header = Some(top);
                state.cursor += style.header_row_height;
                match carry {
                    Some(row) => {
                        let resume = row.item_index + 1;
                        if row.height > state.remaining() {
                            log::warn!(
                                "Row {} is taller than a page body ({:.1}pt > {:.1}pt); drawing it overflowing",
                                row.item_index,
                                row.height,
                                state.remaining()
                            );
                        }
                        place_row(state, row);
                        TableState::RowInProgress(resume)
                    }
                    None => TableState::RowInProgress(0),
                }
            }
            TableState::RowInProgress(i) => match items.get(i) {
                None => TableState::Complete,
                Some(item) => {
                    let row = measure_row(i, item, style);
                    let fits = row.height <= state.remaining();
                    let page_has_rows = !state.page().rows.is_empty();
                    if fits {
                        place_row(state, row);
                        TableState::RowInProgress(i + 1)
                    } else if page_has_rows {
                        TableState::PageBreakNeeded(row)
                    } else if row.height <= fresh_capacity {
                        // Take back the header row so it does not sit alone at the page bottom.
                        if let Some(top) = state.page_mut().table_header.take() {
                            state.cursor = top;
                        }
                        TableState::PageBreakNeeded(row)
                    } else {
                        log::warn!(
                            "Row {} is taller than a page body ({:.1}pt > {:.1}pt); drawing it overflowing",
                            i,
                            row.height,
                            state.remaining()
                        );
                        place_row(state, row);
                        TableState::RowInProgress(i + 1)
                    }
                }
            },
            TableState::PageBreakNeeded(row) => {
                state.break_page();
                TableState::HeaderPending { carry: Some(row) }
            }
            TableState::Complete => break,
        };
    }
}

pub(crate) fn draw_table_header(
    canvas: &mut Canvas,
    top: f32,
    columns: &Columns,
    geo: &Geometry,
    style: &TableStyle,
    brand: &Branding,
) {
    canvas.fill_rect(geo.margin, top, geo.usable_width, style.header_row_height, brand.primary);
    let baseline = top + style.header_row_height * 0.625;
    for (col, label) in HEADER_LABELS.iter().enumerate() {
        canvas.text(
            columns.left(col) + CELL_PAD,
            baseline,
            label,
            Font::Bold,
            style.header_font_size,
            [255, 255, 255],
            Align::Left,
        );
    }
}

pub(crate) fn draw_row(
    canvas: &mut Canvas,
    row: &PlacedRow,
    item: &LineItem,
    columns: &Columns,
    geo: &Geometry,
    style: &TableStyle,
    brand: &Branding,
) {
    if row.item_index % 2 == 0 {
        canvas.fill_rect(geo.margin, row.top, geo.usable_width, row.height, brand.row_shade);
    }

    let first_baseline = row.top + style.base_row_height * (5.0 / 7.0);
    for (k, line) in row.lines.iter().enumerate() {
        canvas.text(
            columns.left(0) + CELL_PAD,
            first_baseline + k as f32 * style.base_row_height,
            line,
            Font::Regular,
            style.font_size,
            brand.muted,
            Align::Left,
        );
    }

    let centre = row.top + row.height / 2.0 + style.font_size * 0.35;
    let cells = [
        (1, format_quantity(item.quantity), Align::Left),
        (2, item.unit.clone(), Align::Left),
        (3, format_money(item.unit_price), Align::Right),
        (4, format_money(item.total_ht), Align::Right),
    ];
    for (col, text, align) in cells {
        let x = match align {
            Align::Right => columns.right(col) - CELL_PAD,
            _ => columns.left(col) + CELL_PAD,
        };
        canvas.text(x, centre, &text, Font::Regular, style.font_size, brand.muted, align);
    }
}
