use std::path::PathBuf;

use thiserror::Error;
use wizard_config::ConfigError;
use wizard_core::CoreError;

/// Error type for the generator and the application entry points.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot read form description {path}: {reason}")]
    FormDocument { path: PathBuf, reason: String },
    #[error("Form has no pages")]
    EmptyForm,
}
