use crate::utils::validation::ValidationFailures;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Layout validation failed: {0}")]
    Validation(ValidationFailures),

    #[error("Control request store failure: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<ValidationFailures> for LayoutError {
    fn from(failures: ValidationFailures) -> Self {
        LayoutError::Validation(failures)
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
