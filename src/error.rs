use thiserror::Error;

#[derive(Error, Debug)]
pub enum KashiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required tool unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Vocal separation error: {0}")]
    Separation(String),

    #[error("No separation output found: {0}")]
    OutputNotFound(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Alignment error: {0}")]
    Alignment(String),
}

pub type Result<T> = std::result::Result<T, KashiError>;
