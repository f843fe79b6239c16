// ABOUTME: Error types for the cardpost application
// ABOUTME: Provides structured error handling for each stage of the card pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Markdown conversion error: {0}")]
    MarkdownError(String),

    #[error("HTML parse error: {0}")]
    HtmlError(String),

    #[error("Preview region not found: {0}")]
    RegionNotFound(String),

    #[error("Failed to rasterize card: {0}")]
    RasterizeFailure(String),

    #[error("Failed to write image to clipboard: {0}")]
    ClipboardFailure(String),

    #[error("Headless browser error: {message}")]
    BrowserError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Settings error: {0}")]
    SettingsError(#[from] serde_json::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("No markdown files found matching pattern: {0}")]
    NoInputsFoundError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our CardError
impl From<anyhow::Error> for CardError {
    fn from(err: anyhow::Error) -> Self {
        CardError::UnknownError(err.to_string())
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for CardError {
    fn from(err: zip::result::ZipError) -> Self {
        CardError::ArchiveError(format!("ZIP operation failed: {}", err))
    }
}

impl From<quick_xml::Error> for CardError {
    fn from(err: quick_xml::Error) -> Self {
        CardError::HtmlError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
