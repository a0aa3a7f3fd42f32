//! Collaborator services that fill a quote before it is rendered: line-item
//! generation from a project description and item import from uploaded files.
//!
//! Only the interfaces and the offline implementations live here. A caller
//! wanting a remote generator implements [`LineItemGenerator`] and wraps it in
//! [`WithFallback`] so failures degrade to the keyword heuristics.

use crate::error::Error;
use crate::model::{CreationMethod, LineItem, QuoteDocument};
use crate::pricing::reprice_with_margin;

const DEFAULT_TITLE: &str = "Devis travaux";
const SHORT_PROMPT_CHARS: usize = 50;

#[derive(Clone, Debug, Default)]
pub struct GenerationRequest {
    pub project_description: String,
    pub client_name: Option<String>,
    pub tva_rate: Option<f64>,
    pub min_margin: Option<f64>,
    pub creation_method: Option<CreationMethod>,
    /// Used as the quote title when no keyword suggests a better one.
    pub project_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedItems {
    /// Cost prices; margins are applied by [`apply_generation`].
    pub items: Vec<LineItem>,
    pub suggested_description: String,
    pub quote_title: String,
}

pub trait LineItemGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedItems, Error>;
}

/// Offline generator routing on keywords in the project description.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicGenerator;

fn numbered(lines: &[(&str, f64, &str, f64)]) -> Vec<LineItem> {
    lines
        .iter()
        .enumerate()
        .map(|(i, &(description, quantity, unit, unit_price))| LineItem {
            id: Some(format!("{}", i + 1)),
            ..LineItem::new(description, quantity, unit, unit_price)
        })
        .collect()
}

impl HeuristicGenerator {
    fn items_for(keywords: &str) -> Vec<LineItem> {
        if keywords.contains("garage") || keywords.contains("construction") {
            numbered(&[
                ("Étude de sol et implantation", 1.0, "forfait", 750.0),
                ("Fondations en béton armé", 45.0, "m²", 120.0),
                ("Structure en parpaing", 85.0, "m²", 95.0),
                ("Charpente métallique", 1.0, "forfait", 3200.0),
                ("Couverture en tuiles", 50.0, "m²", 85.0),
            ])
        } else if keywords.contains("salle de bain") || keywords.contains("sanitaire") {
            numbered(&[
                ("Démolition et préparation", 1.0, "forfait", 850.0),
                ("Plomberie et évacuations", 1.0, "forfait", 1200.0),
                ("Carrelage mural", 22.0, "m²", 75.0),
                ("Douche à l'italienne", 1.0, "unité", 2400.0),
            ])
        } else {
            numbered(&[
                ("Étude préliminaire", 1.0, "forfait", 500.0),
                ("Main d'oeuvre", 35.0, "heure", 45.0),
                ("Fournitures et matériaux", 1.0, "forfait", 2500.0),
            ])
        }
    }

    fn suggested_description(prompt: &str, keywords: &str) -> String {
        if prompt.chars().count() < SHORT_PROMPT_CHARS {
            if keywords.contains("garage") {
                return "Construction d'un garage attenant à l'habitation principale. Structure en parpaing avec couverture en tuiles, incluant une porte sectionnelle motorisée et raccordement électrique. Surface au sol d'environ 25m².".to_string();
            }
            if keywords.contains("salle de bain") {
                return "Rénovation complète d'une salle de bain incluant la dépose des anciens équipements, création d'une douche à l'italienne, pose de carrelage mural et au sol, installation d'un meuble vasque et d'un WC suspendu, mise aux normes électriques.".to_string();
            }
        }
        prompt.to_string()
    }

    fn title_for(keywords: &str, project_name: Option<&str>) -> String {
        let title = if keywords.contains("garage") {
            "Construction garage attenant avec motorisation"
        } else if keywords.contains("salle de bain") {
            "Rénovation complète salle de bain"
        } else if keywords.contains("toiture") || keywords.contains("toit") {
            "Réfection toiture et étanchéité"
        } else if keywords.contains("isolation") {
            "Travaux isolation thermique"
        } else {
            project_name.unwrap_or(DEFAULT_TITLE)
        };
        title.to_string()
    }
}

impl LineItemGenerator for HeuristicGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedItems, Error> {
        let keywords = request.project_description.to_lowercase();
        let project_name = request
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        Ok(GeneratedItems {
            items: Self::items_for(&keywords),
            suggested_description: Self::suggested_description(&request.project_description, &keywords),
            quote_title: Self::title_for(&keywords, project_name),
        })
    }
}

/// Runs `primary`, answering from [`HeuristicGenerator`] when it fails.
#[derive(Clone, Debug, Default)]
pub struct WithFallback<G> {
    primary: G,
    fallback: HeuristicGenerator,
}

impl<G: LineItemGenerator> WithFallback<G> {
    pub fn new(primary: G) -> Self {
        Self {
            primary,
            fallback: HeuristicGenerator,
        }
    }
}

impl<G: LineItemGenerator> LineItemGenerator for WithFallback<G> {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedItems, Error> {
        match self.primary.generate(request) {
            Ok(generated) => Ok(generated),
            Err(e) => {
                log::warn!("Line item generation failed ({e}); using keyword fallback");
                self.fallback.generate(request)
            }
        }
    }
}

/// Replace the quote's items with generated ones, priced at the quote's margin.
pub fn apply_generation(quote: &mut QuoteDocument, generated: GeneratedItems) {
    let mut items = generated.items;
    reprice_with_margin(&mut items, quote.min_margin.unwrap_or(0.0));
    quote.items = items;
    quote.quote_title = Some(generated.quote_title);
    if !generated.suggested_description.trim().is_empty() {
        quote.project_description = Some(generated.suggested_description);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentKind {
    /// Technical specification, no prices.
    Cctp,
    /// Priced breakdown.
    Dpgf,
    #[default]
    Auto,
}

impl DocumentKind {
    /// Guess from a file name; anything unrecognised is treated as a priced breakdown.
    pub fn detect(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if ["cctp", "technique", "clauses"].iter().any(|k| lower.contains(k)) {
            DocumentKind::Cctp
        } else {
            DocumentKind::Dpgf
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportOptions {
    pub kind: DocumentKind,
    pub include_descriptions: bool,
    pub detect_prices: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            kind: DocumentKind::Auto,
            include_descriptions: true,
            detect_prices: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub siret: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportResult {
    pub success: bool,
    pub items: Vec<LineItem>,
    pub title: Option<String>,
    pub client_info: Option<ClientInfo>,
    pub message: String,
}

impl ImportResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Extraction failures are reported in the result, not as errors.
pub trait DocumentImporter {
    fn extract(&self, file: &ImportFile, options: &ImportOptions) -> ImportResult;
}

/// Rejects anything that is not a PDF before handing it to `inner`.
#[derive(Clone, Debug, Default)]
pub struct PdfTypeGuard<I> {
    inner: I,
}

impl<I> PdfTypeGuard<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: DocumentImporter> DocumentImporter for PdfTypeGuard<I> {
    fn extract(&self, file: &ImportFile, options: &ImportOptions) -> ImportResult {
        if !file.mime_type.to_lowercase().contains("pdf") {
            log::debug!("IMPORT rejected {} ({})", file.name, file.mime_type);
            return ImportResult::failure("Le fichier doit être au format PDF");
        }
        self.inner.extract(file, options)
    }
}

/// Offline importer: no text extraction, answers with the standard lot
/// breakdown for the detected document kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateImporter;

impl DocumentImporter for TemplateImporter {
    fn extract(&self, file: &ImportFile, options: &ImportOptions) -> ImportResult {
        let kind = match options.kind {
            DocumentKind::Auto => DocumentKind::detect(&file.name),
            kind => kind,
        };
        let (items, title, message) = match kind {
            DocumentKind::Cctp => (
                numbered(&[
                    ("Préparation du chantier et installation", 1.0, "forfait", 1200.0),
                    ("Fourniture et pose d'isolation thermique par l'extérieur", 120.0, "m²", 85.0),
                    ("Enduit de finition taloché grain fin", 120.0, "m²", 35.0),
                ]),
                "Travaux d'isolation thermique par l'extérieur",
                "Extraction réussie du CCTP",
            ),
            _ => (
                numbered(&[
                    ("Lot 1 - Préparation et installation", 1.0, "forfait", 1500.0),
                    ("Lot 2 - Gros œuvre", 1.0, "forfait", 12500.0),
                    ("Lot 3 - Menuiseries extérieures", 8.0, "unité", 850.0),
                    ("Lot 4 - Plomberie", 1.0, "forfait", 4200.0),
                    ("Lot 5 - Électricité", 1.0, "forfait", 3800.0),
                ]),
                "Construction maison individuelle",
                "Extraction réussie du DPGF",
            ),
        };
        let items = if options.detect_prices {
            items
        } else {
            items
                .into_iter()
                .map(|item| LineItem {
                    unit_price: 0.0,
                    total_ht: 0.0,
                    ..item
                })
                .collect()
        };
        ImportResult {
            success: true,
            items,
            title: Some(title.to_string()),
            client_info: None,
            message: message.to_string(),
        }
    }
}

/// Merge an import into the quote. Only non-empty imported fields override,
/// items are appended. Returns whether anything was applied.
pub fn apply_import(quote: &mut QuoteDocument, result: ImportResult) -> bool {
    if !result.success || result.items.is_empty() {
        return false;
    }
    fn keep(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    if let Some(title) = keep(result.title) {
        quote.quote_title = Some(title);
    }
    if let Some(info) = result.client_info {
        if let Some(name) = keep(info.name) {
            quote.client_name = name;
        }
        let fields = [
            (&mut quote.client_address, info.address),
            (&mut quote.client_email, info.email),
            (&mut quote.client_phone, info.phone),
            (&mut quote.client_siret, info.siret),
        ];
        for (slot, value) in fields {
            if let Some(v) = keep(value) {
                *slot = Some(v);
            }
        }
    }
    log::debug!("IMPORT appending {} items to quote {}", result.items.len(), quote.id);
    quote.items.extend(result.items);
    true
}

/// The collaborators a caller hands to the quote flows.
pub struct ServiceContext {
    pub generator: Box<dyn LineItemGenerator>,
    pub importer: Box<dyn DocumentImporter>,
}

impl ServiceContext {
    pub fn new(generator: Box<dyn LineItemGenerator>, importer: Box<dyn DocumentImporter>) -> Self {
        Self { generator, importer }
    }

    /// Keyword generator and template importer, no network.
    pub fn offline() -> Self {
        Self::new(
            Box::new(HeuristicGenerator),
            Box::new(PdfTypeGuard::new(TemplateImporter)),
        )
    }
}
