//! Persisted quote records and the stores that hold them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::{CreationMethod, LineItem, QuoteDocument, QuoteStatus, default_tva_rate, present};
use crate::pdf::format::format_money;

/// Key under which the quote list lives in a store file.
const QUOTES_KEY: &str = "quotes";

/// A saved quote: list display fields plus everything needed to reopen it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub id: String,
    pub client: String,
    /// Formatted grand total, e.g. `6 030,00 €`.
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub status: QuoteStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_siret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_title: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tva_rate: Option<f64>,
    #[serde(default, rename = "totalHT", skip_serializing_if = "Option::is_none")]
    pub total_ht: Option<f64>,
    #[serde(default, rename = "totalTVA", skip_serializing_if = "Option::is_none")]
    pub total_tva: Option<f64>,
    #[serde(default, rename = "totalTTC", skip_serializing_if = "Option::is_none")]
    pub total_ttc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_method: Option<CreationMethod>,
    /// Keys this crate does not model (notes, paymentTerms, dueDate, ...),
    /// written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuoteRecord {
    /// Snapshot a document, freezing its totals into the record.
    pub fn from_document(doc: &QuoteDocument, creation_method: Option<CreationMethod>) -> Self {
        let totals = doc.totals();
        Self {
            id: doc.id.clone(),
            client: doc.client_name.clone(),
            amount: format_money(totals.ttc),
            date: doc.date.clone(),
            status: doc.status.clone(),
            client_name: Some(doc.client_name.clone()),
            client_address: doc.client_address.clone(),
            client_email: doc.client_email.clone(),
            client_phone: doc.client_phone.clone(),
            client_siret: doc.client_siret.clone(),
            project_description: doc.project_description.clone(),
            quote_title: doc.quote_title.clone(),
            items: doc.items.clone(),
            tva_rate: Some(doc.tva_rate),
            total_ht: Some(totals.ht),
            total_tva: Some(totals.tva),
            total_ttc: Some(totals.ttc),
            min_margin: doc.min_margin,
            creation_method,
            extra: Map::new(),
        }
    }

    /// Rebuild a renderable document, filling whatever older records lack.
    pub fn to_document(&self) -> QuoteDocument {
        let client_name = match present(&self.client_name) {
            Some(name) => name.to_string(),
            None => self.client.clone(),
        };
        let text = |field: &Option<String>| Some(field.clone().unwrap_or_default());
        QuoteDocument {
            id: self.id.clone(),
            client_name,
            client_address: text(&self.client_address),
            client_email: text(&self.client_email),
            client_phone: text(&self.client_phone),
            client_siret: text(&self.client_siret),
            quote_title: self.quote_title.clone(),
            project_description: text(&self.project_description),
            items: self.items.clone(),
            date: self.date.clone(),
            tva_rate: self.tva_rate.unwrap_or_else(default_tva_rate),
            status: self.status.clone(),
            min_margin: self.min_margin,
        }
    }
}

/// Whole-collection persistence for quote records.
pub trait QuoteStore {
    fn load(&self) -> Result<Vec<QuoteRecord>, Error>;
    fn save(&self, records: &[QuoteRecord]) -> Result<(), Error>;
}

pub fn find<'a>(records: &'a [QuoteRecord], id: &str) -> Option<&'a QuoteRecord> {
    records.iter().find(|r| r.id == id)
}

/// Replace the record with the same id in place, or put a new one first.
/// A replacement inherits the creation method and unmodelled keys of the
/// record it replaces when it carries none of its own.
pub fn upsert(records: &mut Vec<QuoteRecord>, mut record: QuoteRecord) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(slot) => {
            if record.creation_method.is_none() {
                record.creation_method = slot.creation_method.take();
            }
            if record.extra.is_empty() {
                record.extra = std::mem::take(&mut slot.extra);
            }
            *slot = record;
        }
        None => records.insert(0, record),
    }
}

/// Drop the record with `id`. Returns whether one was removed.
pub fn remove(records: &mut Vec<QuoteRecord>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id != id);
    records.len() != before
}

/// Snapshot `doc` into the store, replacing any record with its id.
pub fn save_document(
    store: &dyn QuoteStore,
    doc: &QuoteDocument,
    creation_method: Option<CreationMethod>,
) -> Result<QuoteRecord, Error> {
    let mut records = store.load()?;
    let record = QuoteRecord::from_document(doc, creation_method);
    upsert(&mut records, record);
    store.save(&records)?;
    find(&records, &doc.id)
        .cloned()
        .ok_or_else(|| Error::NotFound(doc.id.clone()))
}

/// Delete the record with `id` from the store.
pub fn delete_record(store: &dyn QuoteStore, id: &str) -> Result<(), Error> {
    let mut records = store.load()?;
    if !remove(&mut records, id) {
        return Err(Error::NotFound(id.to_string()));
    }
    store.save(&records)
}

/// Store backed by a JSON object file holding the list under `quotes`.
/// Other top-level keys in the file survive a save.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>, Error> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Config(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl QuoteStore for JsonFileStore {
    fn load(&self) -> Result<Vec<QuoteRecord>, Error> {
        let mut map = self.read_object()?;
        let records = match map.remove(QUOTES_KEY) {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        log::debug!("STORE loaded {} quotes from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn save(&self, records: &[QuoteRecord]) -> Result<(), Error> {
        let mut map = self.read_object()?;
        map.insert(QUOTES_KEY.to_string(), serde_json::to_value(records)?);
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, text)?;
        log::debug!("STORE saved {} quotes to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<QuoteRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<QuoteRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl QuoteStore for MemoryStore {
    fn load(&self) -> Result<Vec<QuoteRecord>, Error> {
        let guard = self
            .records
            .lock()
            .map_err(|_| Error::Service("memory store lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, records: &[QuoteRecord]) -> Result<(), Error> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| Error::Service("memory store lock poisoned".into()))?;
        *guard = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, client: &str) -> QuoteRecord {
        QuoteRecord {
            id: id.into(),
            client: client.into(),
            ..QuoteRecord::default()
        }
    }

    #[test]
    fn upsert_replaces_or_prepends() {
        let mut list = vec![record("1", "A"), record("2", "B")];
        upsert(&mut list, record("2", "B2"));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].client, "B2");

        upsert(&mut list, record("3", "C"));
        assert_eq!(list[0].id, "3");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let mut list = vec![record("1", "A")];
        assert!(!remove(&mut list, "9"));
        assert!(remove(&mut list, "1"));
        assert!(list.is_empty());
    }

    #[test]
    fn legacy_record_fills_defaults() {
        let json = r#"{"id":"DEV-2023-001","client":"Martin SARL","amount":"1 200,00 €","date":"12/05/2023","status":"Accepté"}"#;
        let rec: QuoteRecord = serde_json::from_str(json).unwrap();
        let doc = rec.to_document();
        assert_eq!(doc.client_name, "Martin SARL");
        assert_eq!(doc.tva_rate, 20.0);
        assert_eq!(doc.status, QuoteStatus::Accepted);
        assert_eq!(doc.client_email.as_deref(), Some(""));
        assert!(doc.items.is_empty());
    }

    #[test]
    fn from_document_snapshots_totals() {
        let doc = QuoteDocument {
            id: "7".into(),
            client_name: "Dupont".into(),
            items: vec![LineItem::new("Pose", 2.0, "u", 100.0)],
            tva_rate: 20.0,
            ..QuoteDocument::default()
        };
        let rec = QuoteRecord::from_document(&doc, Some(CreationMethod::Text { description: "pose".into() }));
        assert_eq!(rec.total_ht, Some(200.0));
        assert_eq!(rec.total_ttc, Some(240.0));
        assert_eq!(rec.amount, "240,00 €");
        assert_eq!(rec.client, "Dupont");
    }

    #[test]
    fn unmodelled_keys_survive_an_edit() {
        let json = r#"{"id":"9","client":"A","amount":"","date":"","status":"Brouillon","notes":"Accès par la cour","paymentTerms":"30 jours"}"#;
        let stored: QuoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(stored.extra["notes"], "Accès par la cour");

        let mut list = vec![stored];
        let doc = QuoteDocument {
            id: "9".into(),
            client_name: "A".into(),
            ..QuoteDocument::default()
        };
        upsert(&mut list, QuoteRecord::from_document(&doc, None));
        let out = serde_json::to_value(&list[0]).unwrap();
        assert_eq!(out["paymentTerms"], "30 jours");
        assert_eq!(out["notes"], "Accès par la cour");
    }

    #[test]
    fn save_and_delete_go_through_the_store() {
        let store = MemoryStore::default();
        let doc = QuoteDocument {
            id: "12".into(),
            client_name: "Lefèvre".into(),
            items: vec![LineItem::new("Pose", 1.0, "u", 50.0)],
            tva_rate: 20.0,
            ..QuoteDocument::default()
        };
        let saved = save_document(&store, &doc, None).unwrap();
        assert_eq!(saved.amount, "60,00 €");
        assert_eq!(store.load().unwrap().len(), 1);

        delete_record(&store, "12").unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(matches!(delete_record(&store, "12"), Err(Error::NotFound(_))));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::default();
        store.save(&[record("1", "A")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
