mod common;

use std::fs;

use quoteforge_pdf::model::CreationMethod;
use quoteforge_pdf::store::{
    JsonFileStore, QuoteRecord, QuoteStore, delete_record, find, remove, save_document, upsert,
};

#[test]
fn json_store_round_trips_and_keeps_other_keys() {
    let path = common::output_dir("store").join("quotes.json");
    fs::write(&path, r#"{ "settings": { "theme": "dark" } }"#).unwrap();
    let store = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_empty());

    let doc = common::three_item_quote();
    let mut records = store.load().unwrap();
    upsert(
        &mut records,
        QuoteRecord::from_document(&doc, Some(CreationMethod::Pdf { file_name: Some("dpgf.pdf".into()) })),
    );
    store.save(&records).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["settings"]["theme"], "dark");
    assert_eq!(raw["quotes"][0]["client"], "Dupont Construction");
    assert_eq!(raw["quotes"][0]["totalTTC"], 6030.0);
    assert_eq!(raw["quotes"][0]["creationMethod"]["kind"], "pdf");

    let loaded = store.load().unwrap();
    let rec = find(&loaded, "DEV-2024-001").expect("saved record");
    assert_eq!(rec.to_document(), QuoteRecord::from_document(&doc, None).to_document());
    assert_eq!(rec.to_document().totals(), doc.totals());
}

#[test]
fn missing_store_file_loads_empty() {
    let path = common::output_dir("store_missing").join("absent.json");
    let _ = fs::remove_file(&path);
    assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
}

#[test]
fn editing_replaces_in_place() {
    let path = common::output_dir("store_edit").join("quotes.json");
    let _ = fs::remove_file(&path);
    let store = JsonFileStore::new(&path);

    let mut a = common::quote("A", common::uniform_items(2));
    let b = common::quote("B", common::uniform_items(3));
    let mut records = Vec::new();
    upsert(&mut records, QuoteRecord::from_document(&a, None));
    upsert(&mut records, QuoteRecord::from_document(&b, None));
    store.save(&records).unwrap();

    a.client_name = "Martin SARL".into();
    let mut records = store.load().unwrap();
    upsert(&mut records, QuoteRecord::from_document(&a, Some(CreationMethod::Edit { quote_id: "A".into() })));
    store.save(&records).unwrap();

    let ids: Vec<_> = store.load().unwrap().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec!["B", "A"]);
    let mut records = store.load().unwrap();
    assert_eq!(find(&records, "A").map(|r| r.client.as_str()), Some("Martin SARL"));

    assert!(remove(&mut records, "B"));
    store.save(&records).unwrap();
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn malformed_store_reports_a_json_error() {
    let path = common::output_dir("store_bad").join("quotes.json");
    fs::write(&path, "{ \"quotes\": [ ").unwrap();
    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, quoteforge_pdf::Error::Json { .. }));
}

#[test]
fn resaving_keeps_notes_and_payment_terms() {
    let path = common::output_dir("store_extra").join("quotes.json");
    fs::write(
        &path,
        r#"{ "quotes": [ { "id": "DEV-2024-001", "client": "Dupont Construction", "amount": "", "date": "15/03/2024",
            "status": "Envoyé", "notes": "Accès chantier par la cour", "paymentTerms": "30 jours fin de mois",
            "dueDate": "15/04/2024", "createdAt": "2024-03-15T09:00:00Z",
            "creationMethod": { "kind": "text", "description": "rénovation" } } ] }"#,
    )
    .unwrap();
    let store = JsonFileStore::new(&path);

    let saved = save_document(&store, &common::three_item_quote(), None).unwrap();
    assert_eq!(saved.amount, "6 030,00 €");

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let quote = &raw["quotes"][0];
    assert_eq!(quote["notes"], "Accès chantier par la cour");
    assert_eq!(quote["paymentTerms"], "30 jours fin de mois");
    assert_eq!(quote["dueDate"], "15/04/2024");
    assert_eq!(quote["createdAt"], "2024-03-15T09:00:00Z");
    assert_eq!(quote["creationMethod"]["kind"], "text");
    assert_eq!(raw["quotes"].as_array().map(Vec::len), Some(1));

    delete_record(&store, "DEV-2024-001").unwrap();
    assert!(store.load().unwrap().is_empty());
    assert!(delete_record(&store, "DEV-2024-001").is_err());
}
