use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    /// Line total, stored denormalized. Printed as-is, never recomputed.
    #[serde(rename = "totalHT")]
    pub total_ht: f64,
    /// Price before margin, kept so a new margin can be re-applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total_ht: quantity * unit_price,
            cost_price: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Pending,
    Accepted,
    Refused,
    Paid,
    Cancelled,
    Other(String),
}

impl QuoteStatus {
    pub fn label(&self) -> &str {
        match self {
            QuoteStatus::Draft => "Brouillon",
            QuoteStatus::Sent => "Envoyé",
            QuoteStatus::Pending => "En attente",
            QuoteStatus::Accepted => "Accepté",
            QuoteStatus::Refused => "Refusé",
            QuoteStatus::Paid => "Payé",
            QuoteStatus::Cancelled => "Annulé",
            QuoteStatus::Other(s) => s,
        }
    }
}

fn fold_accents(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' => 'a',
            'ù' | 'û' => 'u',
            'ô' => 'o',
            'î' | 'ï' => 'i',
            'ç' => 'c',
            _ => c,
        })
        .collect()
}

impl From<String> for QuoteStatus {
    fn from(s: String) -> Self {
        match fold_accents(&s).as_str() {
            "brouillon" => QuoteStatus::Draft,
            "envoye" => QuoteStatus::Sent,
            "en attente" => QuoteStatus::Pending,
            "accepte" => QuoteStatus::Accepted,
            "refuse" => QuoteStatus::Refused,
            "paye" => QuoteStatus::Paid,
            "annule" => QuoteStatus::Cancelled,
            _ => QuoteStatus::Other(s),
        }
    }
}

impl Serialize for QuoteStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for QuoteStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(QuoteStatus::from)
    }
}

/// How the items of a quote were produced. Drives which editor panel applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CreationMethod {
    Text { description: String },
    Pdf { file_name: Option<String> },
    Image { file_name: Option<String> },
    Cctp { file_name: Option<String> },
    Edit { quote_id: String },
}

impl CreationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CreationMethod::Text { .. } => "text",
            CreationMethod::Pdf { .. } => "pdf",
            CreationMethod::Image { .. } => "image",
            CreationMethod::Cctp { .. } => "cctp",
            CreationMethod::Edit { .. } => "edit",
        }
    }

    /// Whether the items come from an uploaded file rather than a prompt.
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            CreationMethod::Pdf { .. } | CreationMethod::Image { .. } | CreationMethod::Cctp { .. }
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_siret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_tva_rate")]
    pub tva_rate: f64,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_margin: Option<f64>,
}

pub(crate) fn default_tva_rate() -> f64 {
    20.0
}

impl QuoteDocument {
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items, self.tva_rate)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub ht: f64,
    pub tva: f64,
    pub ttc: f64,
}

impl Totals {
    pub fn compute(items: &[LineItem], tva_rate: f64) -> Self {
        let ht: f64 = items.iter().map(|i| i.total_ht).sum();
        let tva = ht * (tva_rate / 100.0);
        Self { ht, tva, ttc: ht + tva }
    }
}

/// Non-empty optional text, trimmed.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_follow_items() {
        let items = vec![
            LineItem::new("Étude préliminaire", 1.0, "forfait", 500.0),
            LineItem::new("Parquet chêne", 25.0, "m²", 85.0),
            LineItem::new("Douche", 1.0, "u", 2400.0),
        ];
        let t = Totals::compute(&items, 20.0);
        assert_eq!(t.ht, 5025.0);
        assert_eq!(t.tva, 1005.0);
        assert_eq!(t.ttc, 6030.0);
    }

    #[test]
    fn status_parses_without_accents() {
        assert_eq!(QuoteStatus::from("accepte".to_string()), QuoteStatus::Accepted);
        assert_eq!(QuoteStatus::from("Envoyé".to_string()), QuoteStatus::Sent);
        assert_eq!(
            QuoteStatus::from("Archivé".to_string()),
            QuoteStatus::Other("Archivé".to_string())
        );
    }

    #[test]
    fn quote_json_uses_camel_case() {
        let json = r#"{
            "id": "1042",
            "clientName": "Martin",
            "items": [{"description": "Pose", "quantity": 2, "unit": "h", "unitPrice": 45, "totalHT": 90}],
            "date": "12/03/2025",
            "tvaRate": 10,
            "status": "En attente"
        }"#;
        let q: QuoteDocument = serde_json::from_str(json).unwrap();
        assert_eq!(q.items[0].total_ht, 90.0);
        assert_eq!(q.status, QuoteStatus::Pending);
        assert_eq!(q.totals().ttc, 99.0);
    }

    #[test]
    fn creation_method_is_tagged() {
        let m = CreationMethod::Edit { quote_id: "7".into() };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"kind":"edit","quote_id":"7"}"#);
        assert!(!m.is_import());
    }
}
