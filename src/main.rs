use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quoteforge_pdf::services::{GenerationRequest, ServiceContext, apply_generation};
use quoteforge_pdf::pricing::check_margin;
use quoteforge_pdf::store::{JsonFileStore, QuoteStore, delete_record, find, save_document};
use quoteforge_pdf::{Error, QuoteDocument, RenderConfig};

const STORE_ENV: &str = "QUOTEFORGE_STORE";
const DEFAULT_STORE: &str = "quotes.json";

#[derive(Parser)]
#[command(name = "quoteforge-pdf", about = "Render quotes (devis) to paginated PDF", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a quote JSON file to PDF
    Render {
        /// Quote document (camelCase JSON)
        input: PathBuf,

        /// Output PDF path (defaults to devis-{id}-{client}.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a saved quote from the store
    Export {
        id: String,

        #[arg(long)]
        store: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[arg(long)]
        filename: Option<String>,
    },

    /// Save a quote JSON file into the store, replacing any quote with its id
    Save {
        /// Quote document (camelCase JSON)
        input: PathBuf,

        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Delete a saved quote
    Delete {
        id: String,

        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List saved quotes
    List {
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Draft a quote from a project description with the offline generator
    Generate {
        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        title: Option<String>,

        /// TVA rate in percent
        #[arg(long, default_value_t = 20.0)]
        tva: f64,

        /// Margin in percent applied to generated cost prices, in [0, 100)
        #[arg(short, long, value_parser = parse_margin)]
        margin: Option<f64>,
    },
}

fn parse_margin(arg: &str) -> Result<f64, String> {
    let margin: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    check_margin(margin).map_err(|e| e.to_string())
}

fn store_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(STORE_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
}

/// The engine never reads the clock; undated quotes get today's date here.
fn fill_date(quote: &mut QuoteDocument) {
    if quote.date.trim().is_empty() {
        quote.date = chrono::Local::now().format("%d/%m/%Y").to_string();
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig, Error> {
    match path {
        Some(p) => RenderConfig::from_json_file(p),
        None => Ok(RenderConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Commands::Render { input, output, config } => {
            let text = std::fs::read_to_string(&input)?;
            let mut quote: QuoteDocument = serde_json::from_str(&text)?;
            fill_date(&mut quote);
            let config = load_config(config.as_deref())?;

            let output = output.unwrap_or_else(|| PathBuf::from(quoteforge_pdf::default_filename(&quote)));
            let dir = match output.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let name = output.file_name().and_then(|n| n.to_str());
            let path = quoteforge_pdf::download_document_with(&quote, name, &dir, &config)?;
            println!("{}", path.display());
        }

        Commands::Export { id, store, output, filename } => {
            let store = JsonFileStore::new(store_path(store));
            let records = store.load()?;
            let record = find(&records, &id).ok_or_else(|| Error::NotFound(id.clone()))?;
            let mut quote = record.to_document();
            fill_date(&mut quote);
            let path = quoteforge_pdf::download_document(&quote, filename.as_deref(), &output)?;
            println!("{}", path.display());
        }

        Commands::Save { input, store } => {
            let text = std::fs::read_to_string(&input)?;
            let mut quote: QuoteDocument = serde_json::from_str(&text)?;
            if quote.id.trim().is_empty() {
                return Err(Error::Config(format!("{} has no quote id", input.display())));
            }
            fill_date(&mut quote);
            let store = JsonFileStore::new(store_path(store));
            let record = save_document(&store, &quote, None)?;
            println!("{}\t{}", record.id, record.amount);
        }

        Commands::Delete { id, store } => {
            let store = JsonFileStore::new(store_path(store));
            delete_record(&store, &id)?;
            println!("{id}");
        }

        Commands::List { store } => {
            let store = JsonFileStore::new(store_path(store));
            for r in store.load()? {
                println!("{}\t{}\t{}\t{}\t{}", r.id, r.client, r.amount, r.date, r.status.label());
            }
        }

        Commands::Generate { description, title, tva, margin } => {
            let services = ServiceContext::offline();
            let request = GenerationRequest {
                project_description: description.clone(),
                tva_rate: Some(tva),
                min_margin: margin,
                project_name: title,
                ..GenerationRequest::default()
            };
            let generated = services.generator.generate(&request)?;
            let mut quote = QuoteDocument {
                project_description: Some(description),
                tva_rate: tva,
                min_margin: margin,
                ..QuoteDocument::default()
            };
            apply_generation(&mut quote, generated);
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
