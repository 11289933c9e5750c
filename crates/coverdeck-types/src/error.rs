//! Error types for coverdeck.

use std::io;
use std::path::PathBuf;

/// Errors produced by coverdeck.
#[derive(Debug, thiserror::Error)]
pub enum CoverdeckError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("catalog directory not found: {}", .0.display())]
    CatalogMissing(PathBuf),

    #[error("catalog is empty: {}", .0.display())]
    CatalogEmpty(PathBuf),

    #[error("no search results for {0:?}")]
    NoResults(String),

    #[error("metadata record is missing {0}")]
    MissingField(&'static str),

    #[error("no front boxart in record")]
    NoBoxart,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("launch error: {0}")]
    Launch(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl CoverdeckError {
    /// Whether this error means there is nothing to show, which the
    /// application treats as fatal at startup.
    pub fn is_catalog_fatal(&self) -> bool {
        matches!(self, Self::CatalogMissing(_) | Self::CatalogEmpty(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CoverdeckError>;
