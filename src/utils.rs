//! Filesystem helpers shared by the CLI.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/sift/sift.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("sift").join("sift.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Reads pasted feedback text from a file, or from stdin when `path` is `-`.
pub fn read_text_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read feedback text from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feedback text: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn get_database_path_returns_valid_path() {
        let path = get_database_path().unwrap();
        assert!(path.ends_with("sift/sift.db"));
    }

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("sift.db");

        ensure_database_directory(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());

        // Existing directories are fine.
        ensure_database_directory(&db_path).unwrap();
    }

    #[test]
    fn read_text_input_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        assert_eq!(read_text_input(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn read_text_input_reports_missing_file() {
        let err = read_text_input(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("here.txt"));
    }
}
