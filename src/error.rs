use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Quote, store or config JSON failed to parse.
    Json {
        source: serde_json::Error,
        hint: String,
    },
    Config(String),
    /// A collaborator service (generation, import) failed.
    Service(String),
    NotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json { source, hint } => {
                write!(f, "Invalid JSON: {source}")?;
                if !hint.is_empty() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            Error::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            Error::Service(msg) => write!(f, "Service error: {msg}"),
            Error::NotFound(id) => write!(f, "Quote not found: {id}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but field names or types do not match (fields are camelCase, e.g. clientName, unitPrice, totalHT).".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input, is the file truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        Error::Json { source: e, hint }
    }
}
