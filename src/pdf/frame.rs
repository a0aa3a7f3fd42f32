//! Per-page furniture: header block and footer rule.

use crate::config::{Branding, MM};
use crate::fonts::Font;
use crate::model::QuoteDocument;

use super::canvas::{Align, Canvas};
use super::layout::{Geometry, PageLabel};

const MARK_WIDTH: f32 = 40.0 * MM;
const MARK_HEIGHT: f32 = 15.0 * MM;

pub(crate) fn draw_header(
    canvas: &mut Canvas,
    quote: &QuoteDocument,
    label: PageLabel,
    geo: &Geometry,
    brand: &Branding,
) {
    let m = geo.margin;
    let right = geo.page_width - m;

    canvas.fill_rect(m, m, MARK_WIDTH, MARK_HEIGHT, brand.accent);
    canvas.text(
        m + MARK_WIDTH / 2.0,
        m + 10.0 * MM,
        &brand.issuer_name,
        Font::Bold,
        14.0,
        [255, 255, 255],
        Align::Center,
    );

    canvas.text(right, m + 10.0 * MM, &brand.document_title, Font::Bold, 24.0, brand.primary, Align::Right);
    canvas.text(right, m + 16.0 * MM, &format!("N° {}", quote.id), Font::Regular, 10.0, brand.muted, Align::Right);
    if !quote.date.trim().is_empty() {
        canvas.text(
            right,
            m + 22.0 * MM,
            &format!("Date: {}", quote.date.trim()),
            Font::Regular,
            10.0,
            brand.muted,
            Align::Right,
        );
    }
    canvas.text(right, m + 28.0 * MM, &label.to_string(), Font::Regular, 8.0, brand.muted, Align::Right);
}

pub(crate) fn draw_footer(canvas: &mut Canvas, geo: &Geometry, brand: &Branding) {
    let rule = geo.footer_rule;
    canvas.line(geo.margin, rule, geo.page_width - geo.margin, rule, 0.5, brand.accent);
    canvas.text(
        geo.page_width / 2.0,
        rule + 5.0 * MM,
        &brand.tagline,
        Font::Regular,
        8.0,
        brand.muted,
        Align::Center,
    );
}
