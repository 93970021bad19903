//! Error types for the cymraeg core.
//!
//! Missing dictionary entries and missing aliases are ordinary control flow
//! and never surface here. What does surface is anything that breaks the G2P
//! contract: a model that fails to load or run, an unreadable pack, or bad
//! configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The inference model failed to load or execute.
    #[error("Inference error: {0}")]
    Inference(String),

    /// The G2P pack archive is missing a member or is not a valid archive.
    #[error("G2P pack error: {0}")]
    Pack(String),

    /// A pronunciation dictionary could not be parsed.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Pack(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Dictionary(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
