// ABOUTME: Utility functions for the cardpost application
// ABOUTME: Provides helpers for path validation, input discovery and file naming

use crate::errors::{CardError, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use url::Url;

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CardError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CardError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(CardError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    let test_file = path.join(format!("test_write_{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&test_file) {
        Ok(_) => {
            if let Err(e) = std::fs::remove_file(&test_file) {
                warn!("Failed to clean up test file {:?}: {}", test_file, e);
            }
            Ok(())
        }
        Err(e) => Err(CardError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        CardError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Expand a file path or glob pattern into the markdown files it names, sorted
pub fn resolve_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let direct = Path::new(pattern);
    if direct.is_file() {
        return Ok(vec![direct.to_path_buf()]);
    }

    let entries = glob::glob(pattern)
        .map_err(|e| CardError::ValidationError(format!("Invalid pattern {}: {}", pattern, e)))?;

    let mut inputs = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && is_markdown(&path) => inputs.push(path),
            Ok(path) => debug!("Skipping non-markdown match {:?}", path),
            Err(e) => warn!("Unreadable match for {}: {}", pattern, e),
        }
    }
    inputs.sort();

    if inputs.is_empty() {
        return Err(CardError::NoInputsFoundError(pattern.to_string()));
    }
    Ok(inputs)
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "md" || ext == "markdown"
        })
        .unwrap_or(false)
}

/// File name prefix for images exported from a markdown file
pub fn file_prefix(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(char::is_whitespace, "_"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| crate::export::DEFAULT_FILE_PREFIX.to_string())
}

/// Base URL so relative image paths in a note resolve next to the note
pub fn base_href_for(markdown_path: &Path) -> Option<Url> {
    let absolute = get_absolute_path(markdown_path).ok()?;
    Url::from_directory_path(absolute.parent()?).ok()
}
