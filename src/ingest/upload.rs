//! Validation of CSV files before they reach the parser.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::FeedbackError;

/// Largest accepted CSV upload, in bytes (5 MB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Checks a file's name and size before parsing.
///
/// The extension check is case-insensitive and runs first.
pub fn validate_upload(name: &str, size: u64) -> Result<(), FeedbackError> {
    if !name.to_lowercase().ends_with(".csv") {
        return Err(FeedbackError::WrongExtension {
            name: name.to_string(),
        });
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(FeedbackError::OversizedFile {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// Validates and reads a CSV file into a string.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since feedback
/// exports from spreadsheet tools are frequently not clean UTF-8.
///
/// # Errors
///
/// Returns a [`FeedbackError`] (wrapped in `anyhow`) for a rejected upload,
/// or an I/O error if the file cannot be read.
pub fn read_csv_file(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    validate_upload(&name, metadata.len())?;

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
