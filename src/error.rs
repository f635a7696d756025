use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("module '{module}' is missing required field '{field}'")]
    Validation { module: String, field: String },

    #[error("not authorized (HTTP {status})")]
    Authorization { status: u16 },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("slug '{0}' is not available")]
    SlugUnavailable(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ComposerError {
    /// Validation-class errors block publish before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ComposerError::Validation { .. } | ComposerError::SlugUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ComposerError>;
