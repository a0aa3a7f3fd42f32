//! Totals summary and the two signature zones that close the document.

use crate::config::{Branding, MM};
use crate::fonts::Font;
use crate::model::Totals;

use super::canvas::{Align, Canvas};
use super::format::{format_money, format_rate};
use super::layout::{Geometry, RenderState};

const LEAD_GAP: f32 = 8.0 * MM;
const TOTALS_WIDTH: f32 = 80.0 * MM;
const TOTALS_HEIGHT: f32 = 25.0 * MM;
/// From the top of the totals box to the signatures caption.
const TOTALS_TO_CAPTION: f32 = 32.0 * MM;
const CAPTION_TO_BOXES: f32 = 6.0 * MM;
const SIGNATURE_HEIGHT: f32 = 40.0 * MM;
const BOX_RADIUS: f32 = 3.0 * MM;

/// The block is placed as one unit, never split across pages.
pub(crate) const TRAILER_HEIGHT: f32 = LEAD_GAP + TOTALS_TO_CAPTION + CAPTION_TO_BOXES + SIGNATURE_HEIGHT;

pub(crate) fn place_trailer(state: &mut RenderState) {
    if state.remaining() < TRAILER_HEIGHT {
        log::debug!(
            "TRAILER needs {:.2}pt, {:.2}pt left on page {}; moving to a new page",
            TRAILER_HEIGHT,
            state.remaining(),
            state.pages.len()
        );
        state.break_page();
        if state.remaining() < TRAILER_HEIGHT {
            log::warn!(
                "Totals and signatures ({TRAILER_HEIGHT:.1}pt) do not fit on an empty page ({:.1}pt)",
                state.remaining()
            );
        }
    }
    let top = state.cursor;
    state.page_mut().trailer = Some(top);
    state.cursor += TRAILER_HEIGHT;
}

pub(crate) fn draw_trailer(
    canvas: &mut Canvas,
    top: f32,
    totals: &Totals,
    tva_rate: f64,
    geo: &Geometry,
    brand: &Branding,
) {
    let right = geo.margin + geo.usable_width;

    // Totals box
    let box_top = top + LEAD_GAP;
    let box_x = right - TOTALS_WIDTH;
    canvas.fill_rect(box_x, box_top, TOTALS_WIDTH, TOTALS_HEIGHT, brand.light);
    let rows = [
        ("Total HT:".to_string(), totals.ht, 7.0 * MM, Font::Regular, 10.0, brand.muted),
        (format!("TVA ({}%):", format_rate(tva_rate)), totals.tva, 15.0 * MM, Font::Regular, 10.0, brand.muted),
        ("TOTAL TTC:".to_string(), totals.ttc, 23.0 * MM, Font::Bold, 11.0, brand.primary),
    ];
    for (label, amount, dy, font, size, color) in rows {
        let baseline = box_top + dy;
        canvas.text(box_x + 5.0 * MM, baseline, &label, font, size, color, Align::Left);
        canvas.text(right - 5.0 * MM, baseline, &format_money(amount), font, size, color, Align::Right);
    }

    // Signatures
    let caption = box_top + TOTALS_TO_CAPTION;
    canvas.text(geo.margin, caption, "SIGNATURES ET VALIDATION", Font::Bold, 12.0, brand.primary, Align::Left);

    let zones_top = caption + CAPTION_TO_BOXES;
    let zone_width = (geo.usable_width - geo.margin) / 2.0;
    let zones = [
        (geo.margin, "SIGNATURE DE L'ÉMETTEUR", "Bon pour accord"),
        (geo.margin * 2.0 + zone_width, "SIGNATURE DU DESTINATAIRE", "Bon pour acceptation du devis"),
    ];
    for (x, title, hint) in zones {
        canvas.stroke_rounded_rect(x, zones_top, zone_width, SIGNATURE_HEIGHT, BOX_RADIUS, 0.5, brand.light);
        let centre = x + zone_width / 2.0;
        canvas.text(centre, zones_top + 10.0 * MM, title, Font::Bold, 10.0, brand.primary, Align::Center);
        canvas.text(centre, zones_top + 20.0 * MM, hint, Font::Regular, 8.0, brand.muted, Align::Center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSetup;

    fn state_at(cursor: f32) -> RenderState {
        let mut state = RenderState::new(Geometry::new(&PageSetup::default()));
        state.cursor = cursor;
        state
    }

    #[test]
    fn trailer_stays_when_it_fits() {
        let geo = Geometry::new(&PageSetup::default());
        let top = geo.content_bottom - TRAILER_HEIGHT - 1.0;
        let mut state = state_at(top);
        place_trailer(&mut state);
        assert_eq!(state.pages.len(), 1);
        assert_eq!(state.pages[0].trailer, Some(top));
        assert!(state.cursor <= geo.content_bottom);
    }

    #[test]
    fn trailer_moves_whole_to_a_new_page() {
        let geo = Geometry::new(&PageSetup::default());
        let mut state = state_at(geo.content_bottom - TRAILER_HEIGHT + 1.0);
        place_trailer(&mut state);
        assert_eq!(state.pages.len(), 2);
        assert_eq!(state.pages[0].trailer, None);
        assert_eq!(state.pages[1].trailer, Some(geo.continuation_top));
        assert_eq!(state.pages[1].table_header, None);
    }
}
