use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation engine error: {0}")]
    Engine(String),

    #[error("Unknown translation engine: {0}")]
    UnknownEngine(String),

    #[error("Unknown translation mode: {0}")]
    UnknownMode(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Language error: {0}")]
    Language(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Cannot resolve path {0} in document")]
    PathResolution(String),

    #[error("Engine returned {actual} translations for a batch of {expected}")]
    BatchLengthMismatch { expected: usize, actual: usize },

    #[error("Translation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, LingoError>;
