use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinpointError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Authentication failed for user '{user}'")]
    Authentication { user: String },
    #[error("Malformed input in {path}: {message}")]
    MalformedInput { path: String, message: String },
    #[error("Invalid condition '{expression}': {message}")]
    Condition { expression: String, message: String },
    #[error("Schema violation: {0}")]
    Schema(String),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Type mismatch on column '{column}': {message}")]
    TypeMismatch { column: String, message: String },
    #[error("Mandatory attribute not found: {0}")]
    MissingAttribute(String),
    #[error("Dataset '{0}' has no collections")]
    EmptyDataset(String),
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PinpointError>;

// Helper conversions
impl From<config::ConfigError> for PinpointError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl PinpointError {
    pub(crate) fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput { path: path.into(), message: message.into() }
    }
}
