mod error;
mod fonts;

pub mod config;
pub mod model;
pub mod pdf;
pub mod pricing;
pub mod services;
pub mod store;

pub use config::RenderConfig;
pub use error::Error;
pub use model::{CreationMethod, LineItem, QuoteDocument, QuoteStatus, Totals};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Render `quote` with the default A4 layout.
pub fn render_quote_document(quote: &QuoteDocument) -> Result<Vec<u8>, Error> {
    render_quote_document_with(quote, &RenderConfig::default())
}

pub fn render_quote_document_with(quote: &QuoteDocument, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    pdf::render(quote, config)
}

/// `devis-{id}-{client name with whitespace runs as '-'}.pdf`
pub fn default_filename(quote: &QuoteDocument) -> String {
    let client = quote.client_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("devis-{}-{}.pdf", quote.id, client)
}

/// Render `quote` and write it into `dir`, returning the written path.
pub fn download_document(quote: &QuoteDocument, filename: Option<&str>, dir: &Path) -> Result<PathBuf, Error> {
    download_document_with(quote, filename, dir, &RenderConfig::default())
}

pub fn download_document_with(
    quote: &QuoteDocument,
    filename: Option<&str>,
    dir: &Path,
    config: &RenderConfig,
) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let bytes = pdf::render(quote, config)?;
    let t_render = t0.elapsed();

    let name = match filename.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => default_filename(quote),
    };
    let path = dir.join(name);
    std::fs::write(&path, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes to {})",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
        path.display(),
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_collapses_whitespace_runs() {
        let quote = QuoteDocument {
            id: "DEV-2024-003".into(),
            client_name: "  Jean   Dupont SARL ".into(),
            ..QuoteDocument::default()
        };
        assert_eq!(default_filename(&quote), "devis-DEV-2024-003-Jean-Dupont-SARL.pdf");
    }
}
