use std::fmt;

use crate::config::{MM, PageSetup, RenderConfig};
use crate::error::Error;
use crate::model::QuoteDocument;

use super::intro::IntroBlock;
use super::table::place_table;
use super::trailer::{TRAILER_HEIGHT, place_trailer};

/// Fixed vertical landmarks of a page, top-down in points.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geometry {
    pub(crate) page_width: f32,
    pub(crate) margin: f32,
    pub(crate) usable_width: f32,
    /// Where the first page's body starts, below the frame header.
    pub(crate) first_body_top: f32,
    /// Where continuation pages start.
    pub(crate) continuation_top: f32,
    pub(crate) footer_rule: f32,
    /// Nothing in the body may extend below this line.
    pub(crate) content_bottom: f32,
}

impl Geometry {
    pub(crate) fn new(page: &PageSetup) -> Self {
        let footer_rule = page.height - page.margin - 10.0 * MM;
        Self {
            page_width: page.width,
            margin: page.margin,
            usable_width: page.usable_width(),
            first_body_top: page.margin + 35.0 * MM,
            continuation_top: page.margin + 40.0 * MM,
            footer_rule,
            content_bottom: footer_rule - 3.0 * MM,
        }
    }
}

/// A continuation page must hold the totals block on its own, and a table
/// header with one single-line row under it.
pub(crate) fn check_page_body(config: &RenderConfig) -> Result<(), Error> {
    let geo = Geometry::new(&config.page);
    let body = geo.content_bottom - geo.continuation_top;
    let table = config.table.header_row_height + config.table.base_row_height;
    let needed = TRAILER_HEIGHT.max(table);
    if body < needed {
        return Err(Error::Config(format!(
            "page.height {:.1}pt leaves {body:.1}pt of body per page, {needed:.1}pt needed",
            config.page.height
        )));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLabel {
    pub number: usize,
    pub total: usize,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}/{}", self.number, self.total)
    }
}

/// One item row as placed on a page. `lines` is the wrapped description,
/// computed once and reused for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedRow {
    pub item_index: usize,
    pub top: f32,
    pub height: f32,
    pub lines: Vec<String>,
}

/// Body content of one page, produced by the forward pass. The frame
/// (header + footer) is not part of it: it is drawn once the page count is known.
#[derive(Clone, Debug, Default)]
pub struct PageDescriptor {
    pub index: usize,
    pub intro: Option<IntroBlock>,
    /// Top of the table header row, when the page carries one.
    pub table_header: Option<f32>,
    pub rows: Vec<PlacedRow>,
    /// Top of the totals + signature block.
    pub trailer: Option<f32>,
    pub label: Option<PageLabel>,
}

#[derive(Clone, Debug)]
pub struct Pagination {
    pub pages: Vec<PageDescriptor>,
    pub content_bottom: f32,
}

impl Pagination {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Write every page's label from the real page count. Touches nothing but
    /// the labels; running it again yields the same labels.
    pub fn finalize(&mut self) {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.label = Some(PageLabel {
                number: i + 1,
                total,
            });
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.pages
            .iter()
            .filter_map(|p| p.label.map(|l| l.to_string()))
            .collect()
    }
}

/// Forward-pass cursor. Owned by a single `paginate` call.
pub(crate) struct RenderState {
    pub(crate) geo: Geometry,
    pub(crate) pages: Vec<PageDescriptor>,
    pub(crate) cursor: f32,
}

impl RenderState {
    pub(crate) fn new(geo: Geometry) -> Self {
        Self {
            geo,
            pages: vec![PageDescriptor::default()],
            cursor: geo.first_body_top,
        }
    }

    pub(crate) fn page(&self) -> &PageDescriptor {
        &self.pages[self.pages.len() - 1]
    }

    pub(crate) fn page_mut(&mut self) -> &mut PageDescriptor {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.geo.content_bottom - self.cursor
    }

    /// Close the current page and continue on a fresh one.
    pub(crate) fn break_page(&mut self) {
        let index = self.pages.len();
        log::debug!(
            "PAGE break after page={} cursor={:.2} rows={}",
            index,
            self.cursor,
            self.page().rows.len()
        );
        self.pages.push(PageDescriptor {
            index,
            ..PageDescriptor::default()
        });
        self.cursor = self.geo.continuation_top;
    }
}

/// Lay the quote out into page descriptors and resolve page labels.
pub fn paginate(quote: &QuoteDocument, config: &RenderConfig) -> Pagination {
    let geo = Geometry::new(&config.page);
    let mut state = RenderState::new(geo);

    let intro = IntroBlock::build(quote, state.cursor, &geo);
    state.cursor += intro.height();
    state.page_mut().intro = Some(intro);

    place_table(&quote.items, &config.table, &mut state);
    place_trailer(&mut state);

    let mut pagination = Pagination {
        pages: state.pages,
        content_bottom: geo.content_bottom,
    };
    pagination.finalize();
    pagination
}
