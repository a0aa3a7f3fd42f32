//! Client details and quote subject, printed once on the first page above the table.

use crate::config::{Branding, MM};
use crate::fonts::Font;
use crate::model::{QuoteDocument, present};

use super::canvas::{Align, Canvas};
use super::format::{limit_lines, summarize, wrap_text};
use super::layout::Geometry;

const SECTION_GAP: f32 = 8.0 * MM;
const CLIENT_LINE: f32 = 6.0 * MM;
const SUMMARY_LINE: f32 = 5.0 * MM;
const SUMMARY_FONT_SIZE: f32 = 10.0;
const SUMMARY_MAX_LINES: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct IntroBlock {
    pub top: f32,
    pub client_lines: Vec<String>,
    pub summary_lines: Vec<String>,
}

impl IntroBlock {
    pub(crate) fn build(quote: &QuoteDocument, top: f32, geo: &Geometry) -> Self {
        let mut client_lines = vec![format!("Client: {}", quote.client_name)];
        let optional = [
            ("Email", &quote.client_email),
            ("Adresse", &quote.client_address),
            ("Téléphone", &quote.client_phone),
            ("SIRET", &quote.client_siret),
        ];
        for (label, field) in optional {
            if let Some(value) = present(field) {
                client_lines.push(format!("{label}: {value}"));
            }
        }

        let subject = match present(&quote.quote_title) {
            Some(title) => title.to_string(),
            None => summarize(present(&quote.project_description).unwrap_or("Pas de description fournie.")),
        };
        // Helvetica averages a little over half an em per char
        let chars_per_line = (geo.usable_width / (SUMMARY_FONT_SIZE * 0.52)).max(1.0) as usize;
        let summary_lines = limit_lines(wrap_text(&subject, chars_per_line), SUMMARY_MAX_LINES);

        Self {
            top,
            client_lines,
            summary_lines,
        }
    }

    /// Distance from `top` to the table header row.
    pub(crate) fn height(&self) -> f32 {
        SECTION_GAP
            + self.client_lines.len() as f32 * CLIENT_LINE
            + CLIENT_LINE
            + SECTION_GAP
            + self.summary_lines.len() as f32 * SUMMARY_LINE
            + SECTION_GAP
            + SECTION_GAP
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas, geo: &Geometry, brand: &Branding) {
        let x = geo.margin;
        let mut y = self.top;

        canvas.text(x, y, "INFORMATIONS CLIENT", Font::Bold, 12.0, brand.primary, Align::Left);
        y += SECTION_GAP;
        for line in &self.client_lines {
            canvas.text(x, y, line, Font::Regular, 10.0, brand.muted, Align::Left);
            y += CLIENT_LINE;
        }

        y += CLIENT_LINE;
        canvas.text(x, y, "OBJET DU DEVIS", Font::Bold, 12.0, brand.primary, Align::Left);
        y += SECTION_GAP;
        for (i, line) in self.summary_lines.iter().enumerate() {
            canvas.text(
                x,
                y + i as f32 * SUMMARY_LINE,
                line,
                Font::Regular,
                SUMMARY_FONT_SIZE,
                brand.muted,
                Align::Left,
            );
        }
        y += self.summary_lines.len() as f32 * SUMMARY_LINE + SECTION_GAP;

        canvas.text(x, y, "DÉTAIL DU DEVIS", Font::Bold, 12.0, brand.primary, Align::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSetup;

    fn quote() -> QuoteDocument {
        QuoteDocument {
            id: "1042".into(),
            client_name: "Dupont".into(),
            client_email: Some("dupont@example.fr".into()),
            client_phone: Some("  ".into()),
            project_description: Some("Rénovation salle de bain".into()),
            ..QuoteDocument::default()
        }
    }

    #[test]
    fn only_present_client_fields_are_listed() {
        let geo = Geometry::new(&PageSetup::default());
        let intro = IntroBlock::build(&quote(), 100.0, &geo);
        assert_eq!(intro.client_lines, vec!["Client: Dupont", "Email: dupont@example.fr"]);
        assert_eq!(intro.summary_lines, vec!["Rénovation salle de bain"]);
    }

    #[test]
    fn title_wins_over_description() {
        let geo = Geometry::new(&PageSetup::default());
        let mut q = quote();
        q.quote_title = Some("Rénovation complète salle de bain".into());
        let intro = IntroBlock::build(&q, 100.0, &geo);
        assert_eq!(intro.summary_lines, vec!["Rénovation complète salle de bain"]);
    }

    #[test]
    fn subject_is_capped_at_two_lines() {
        let geo = Geometry::new(&PageSetup::default());
        let mut q = quote();
        q.quote_title = Some("mot ".repeat(200));
        let intro = IntroBlock::build(&q, 100.0, &geo);
        assert_eq!(intro.summary_lines.len(), 2);
        assert!(intro.summary_lines[1].ends_with("..."));
    }
}
