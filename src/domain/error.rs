use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Configuration error: {field} for platform '{platform}' is missing. Please configure it via command line, environment or config file.")]
    Config {
        field: &'static str,
        platform: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API HTTP Error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network/Request Error: {0}")]
    Network(String),

    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),

    #[error("Malformed stream frame: {0}")]
    StreamProtocol(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Start-up error: {0}")]
    Init(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Network(error_chain(&e))
    }
}

/// Render an error followed by each of its causes
///
/// reqwest keeps "connection refused" or "timed out" in `source()`, not in
/// its own message.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl TranslateError {
    /// Name of the missing field for configuration errors
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            TranslateError::Config { field, .. } => Some(field),
            _ => None,
        }
    }
}
