//! The gym_core error type.
//!
//! The session store never hands these to its callers; they come out of the
//! key-value storage, config, export and feedback layers and are logged at
//! the store boundary.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A config value the app cannot run with
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("workout catalog is invalid: {0}")]
    CatalogValidation(String),

    /// Key-value storage rejected or failed an operation
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// Vibration, sound or notification output failed
    #[error("feedback unavailable: {0}")]
    Feedback(String),

    #[error("{0}")]
    Other(String),
}
