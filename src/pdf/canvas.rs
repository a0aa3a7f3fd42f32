use pdf_writer::{Content, Name, Str};

use crate::fonts::{Font, text_width, to_winansi_bytes};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// Drawing surface for one page. Coordinates are top-down from the page's
/// top edge, converted to PDF user space on the way out.
pub(crate) struct Canvas {
    content: Content,
    page_height: f32,
}

// Bezier handle length for quarter circles.
const KAPPA: f32 = 0.552_284_8;

fn rgb(c: [u8; 3]) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

impl Canvas {
    pub(crate) fn new(page_height: f32) -> Self {
        Self {
            content: Content::new(),
            page_height,
        }
    }

    fn y(&self, top: f32) -> f32 {
        self.page_height - top
    }

    pub(crate) fn fill_rect(&mut self, x: f32, top: f32, w: f32, h: f32, color: [u8; 3]) {
        let (r, g, b) = rgb(color);
        let y = self.y(top + h);
        self.content.save_state();
        self.content.set_fill_rgb(r, g, b);
        self.content.rect(x, y, w, h);
        self.content.fill_nonzero();
        self.content.restore_state();
    }

    pub(crate) fn line(&mut self, x1: f32, top1: f32, x2: f32, top2: f32, width: f32, color: [u8; 3]) {
        let (r, g, b) = rgb(color);
        let (y1, y2) = (self.y(top1), self.y(top2));
        self.content.save_state();
        self.content.set_line_width(width);
        self.content.set_stroke_rgb(r, g, b);
        self.content.move_to(x1, y1);
        self.content.line_to(x2, y2);
        self.content.stroke();
        self.content.restore_state();
    }

    pub(crate) fn stroke_rounded_rect(
        &mut self,
        x: f32,
        top: f32,
        w: f32,
        h: f32,
        radius: f32,
        width: f32,
        color: [u8; 3],
    ) {
        let (r, g, b) = rgb(color);
        let rad = radius.min(w / 2.0).min(h / 2.0);
        let k = rad * KAPPA;
        let (left, right) = (x, x + w);
        let (bottom, upper) = (self.y(top + h), self.y(top));

        let c = &mut self.content;
        c.save_state();
        c.set_line_width(width);
        c.set_stroke_rgb(r, g, b);
        c.move_to(left + rad, bottom);
        c.line_to(right - rad, bottom);
        c.cubic_to(right - rad + k, bottom, right, bottom + rad - k, right, bottom + rad);
        c.line_to(right, upper - rad);
        c.cubic_to(right, upper - rad + k, right - rad + k, upper, right - rad, upper);
        c.line_to(left + rad, upper);
        c.cubic_to(left + rad - k, upper, left, upper - rad + k, left, upper - rad);
        c.line_to(left, bottom + rad);
        c.cubic_to(left, bottom + rad - k, left + rad - k, bottom, left + rad, bottom);
        c.close_path();
        c.stroke();
        c.restore_state();
    }

    /// Show one line of text. `x` is the left edge, centre or right edge
    /// depending on `align`; `baseline` is top-down.
    pub(crate) fn text(
        &mut self,
        x: f32,
        baseline: f32,
        text: &str,
        font: Font,
        size: f32,
        color: [u8; 3],
        align: Align,
    ) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let start_x = match align {
            Align::Left => x,
            Align::Center => x - text_width(font, size, text) / 2.0,
            Align::Right => x - text_width(font, size, text),
        };
        let (r, g, b) = rgb(color);
        let y = self.y(baseline);
        let c = &mut self.content;
        c.begin_text();
        c.set_fill_rgb(r, g, b);
        c.set_font(Name(font.pdf_name()), size);
        c.next_line(start_x, y);
        c.show(Str(&bytes));
        c.end_text();
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.content.finish().as_slice().to_vec()
    }
}
