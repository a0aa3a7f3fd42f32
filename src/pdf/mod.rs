mod canvas;
pub mod format;
mod frame;
mod intro;
mod layout;
mod table;
mod trailer;

use std::time::Instant;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::config::RenderConfig;
use crate::error::Error;
use crate::fonts::register_fonts;
use crate::model::QuoteDocument;

use canvas::Canvas;
use layout::Geometry;
use table::{Columns, draw_row, draw_table_header};

pub use intro::IntroBlock;
pub use layout::{PageDescriptor, PageLabel, Pagination, PlacedRow, paginate};

/// Lay out and draw `quote`, returning the finished PDF bytes.
pub fn render(quote: &QuoteDocument, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    config.validate()?;
    layout::check_page_body(config)?;

    // Phase 1: forward pass + page labels
    let pagination = paginate(quote, config);
    let t_layout = t0.elapsed();

    // Phase 2: draw every page with its final label
    let geo = Geometry::new(&config.page);
    let brand = &config.branding;
    let style = &config.table;
    let columns = Columns::new(geo.margin, geo.usable_width, style.column_shares);
    let totals = quote.totals();
    let n = pagination.total_pages();

    let mut contents: Vec<Vec<u8>> = Vec::with_capacity(n);
    for (i, page) in pagination.pages.iter().enumerate() {
        let mut canvas = Canvas::new(config.page.height);
        let label = page.label.unwrap_or(PageLabel {
            number: i + 1,
            total: n,
        });
        frame::draw_header(&mut canvas, quote, label, &geo, brand);

        if let Some(intro) = &page.intro {
            intro.draw(&mut canvas, &geo, brand);
        }
        if let Some(top) = page.table_header {
            draw_table_header(&mut canvas, top, &columns, &geo, style, brand);
        }
        for row in &page.rows {
            if let Some(item) = quote.items.get(row.item_index) {
                draw_row(&mut canvas, row, item, &columns, &geo, style, brand);
            }
        }
        if let Some(top) = page.trailer {
            trailer::draw_trailer(&mut canvas, top, &totals, quote.tva_rate, &geo, brand);
        }

        frame::draw_footer(&mut canvas, &geo, brand);
        contents.push(canvas.finish());
    }
    let t_draw = t0.elapsed();

    // Phase 3: assemble the document
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let fonts = register_fonts(&mut pdf, &mut alloc);
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, raw) in contents.iter().enumerate() {
        if config.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw, 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        } else {
            pdf.stream(content_ids[i], raw);
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, config.page.width, config.page.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (font, font_ref) in &fonts {
            font_dict.pair(Name(font.pdf_name()), *font_ref);
        }
    }

    let title = format!("{} {}", brand.document_title, quote.id);
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr(&brand.issuer_name));

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: layout={:.1}ms, draw={:.1}ms, assembly={:.1}ms ({} pages, {} items)",
        t_layout.as_secs_f64() * 1000.0,
        (t_draw - t_layout).as_secs_f64() * 1000.0,
        (t_assembly - t_draw).as_secs_f64() * 1000.0,
        n,
        quote.items.len(),
    );

    Ok(pdf.finish())
}
