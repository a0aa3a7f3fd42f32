mod common;

use quoteforge_pdf::services::{
    ClientInfo, DocumentKind, GenerationRequest, ImportFile, ImportOptions, ImportResult, ServiceContext,
    apply_generation, apply_import,
};
use quoteforge_pdf::{LineItem, render_quote_document};

fn pdf_file(name: &str) -> ImportFile {
    ImportFile {
        name: name.into(),
        mime_type: "application/pdf".into(),
        bytes: b"%PDF-1.7".to_vec(),
    }
}

#[test]
fn offline_context_drafts_a_renderable_quote() {
    let services = ServiceContext::offline();
    let request = GenerationRequest {
        project_description: "Création d'une salle de bain".into(),
        min_margin: Some(25.0),
        ..GenerationRequest::default()
    };
    let generated = services.generator.generate(&request).unwrap();

    let mut quote = common::quote("DEV-G", Vec::new());
    quote.min_margin = Some(25.0);
    apply_generation(&mut quote, generated);

    assert_eq!(quote.items.len(), 4);
    assert_eq!(quote.quote_title.as_deref(), Some("Rénovation complète salle de bain"));
    // 850 / 0.75
    assert_eq!(quote.items[0].unit_price, 1133.0);
    assert_eq!(quote.items[0].cost_price, Some(850.0));
    assert!(render_quote_document(&quote).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn import_appends_items_and_merges_title() {
    let services = ServiceContext::offline();
    let result = services
        .importer
        .extract(&pdf_file("CCTP-isolation.pdf"), &ImportOptions::default());
    assert!(result.success);

    let mut quote = common::quote("DEV-I", vec![LineItem::new("Existant", 1.0, "u", 10.0)]);
    assert!(apply_import(&mut quote, result));
    assert_eq!(quote.items.len(), 4);
    assert_eq!(quote.items[0].description, "Existant");
    assert_eq!(quote.quote_title.as_deref(), Some("Travaux d'isolation thermique par l'extérieur"));
}

#[test]
fn forced_kind_wins_over_the_file_name() {
    let services = ServiceContext::offline();
    let options = ImportOptions {
        kind: DocumentKind::Dpgf,
        detect_prices: false,
        ..ImportOptions::default()
    };
    let result = services.importer.extract(&pdf_file("cctp.pdf"), &options);
    assert_eq!(result.items.len(), 5);
    assert!(result.items.iter().all(|i| i.unit_price == 0.0 && i.total_ht == 0.0));
}

#[test]
fn only_non_empty_client_fields_override() {
    let mut quote = common::three_item_quote();
    let result = ImportResult {
        success: true,
        items: vec![LineItem::new("Lot 6 - Peinture", 1.0, "forfait", 2100.0)],
        title: Some("   ".into()),
        client_info: Some(ClientInfo {
            name: Some(String::new()),
            phone: Some("01 23 45 67 89".into()),
            email: Some(" ".into()),
            ..ClientInfo::default()
        }),
        message: String::new(),
    };
    assert!(apply_import(&mut quote, result));
    assert_eq!(quote.client_name, "Dupont Construction");
    assert_eq!(quote.client_email.as_deref(), Some("contact@dupont-construction.fr"));
    assert_eq!(quote.client_phone.as_deref(), Some("01 23 45 67 89"));
    assert_eq!(quote.quote_title, None);
    assert_eq!(quote.items.len(), 4);
}

#[test]
fn failed_import_changes_nothing() {
    let services = ServiceContext::offline();
    let file = ImportFile {
        name: "photo.jpg".into(),
        mime_type: "image/jpeg".into(),
        bytes: Vec::new(),
    };
    let result = services.importer.extract(&file, &ImportOptions::default());
    let mut quote = common::three_item_quote();
    let before = quote.clone();
    assert!(!apply_import(&mut quote, result));
    assert_eq!(quote, before);
}
