#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use quoteforge_pdf::{LineItem, QuoteDocument};

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn quote(id: &str, items: Vec<LineItem>) -> QuoteDocument {
    QuoteDocument {
        id: id.into(),
        client_name: "Dupont Construction".into(),
        items,
        date: "15/03/2024".into(),
        tva_rate: 20.0,
        ..QuoteDocument::default()
    }
}

/// The three-line bathroom quote: 5 025 HT, 1 005 TVA, 6 030 TTC.
pub fn three_item_quote() -> QuoteDocument {
    let mut q = quote(
        "DEV-2024-001",
        vec![
            LineItem::new("Étude préliminaire", 1.0, "forfait", 500.0),
            LineItem::new("Fourniture et pose de parquet chêne massif", 25.0, "m²", 85.0),
            LineItem::new("Douche à l'italienne", 1.0, "u", 2400.0),
        ],
    );
    q.client_email = Some("contact@dupont-construction.fr".into());
    q.client_address = Some("25 rue des Artisans, 75011 Paris".into());
    q.project_description = Some("Rénovation complète d'une salle de bain".into());
    q
}

/// `n` single-line items.
pub fn uniform_items(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| LineItem::new(format!("Ligne {}", i + 1), 1.0, "u", 100.0))
        .collect()
}
