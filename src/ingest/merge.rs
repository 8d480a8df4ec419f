//! Merging of free-text and CSV feedback into one deduplicated working set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Hard limit on merged lines sent to the clustering step.
pub const MAX_MERGED_LINES: usize = 500;

/// Bookkeeping for a merge, used to tell the user what was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeStats {
    /// Non-empty lines that came from pasted text.
    pub text_count: usize,
    /// Non-empty lines that came from the CSV column.
    pub csv_count: usize,
    /// Lines in the merged result, after the cap.
    pub unique_count: usize,
    /// Whether the cap removed lines.
    pub capped: bool,
    /// Unique lines before the cap was applied.
    pub total_before_cap: usize,
}

/// Deduplicated, capped feedback lines plus merge statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    lines: Vec<String>,
    stats: MergeStats,
}

impl MergeResult {
    /// Returns the merged lines in first-occurrence order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the merge statistics.
    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Splits the result into its lines and statistics.
    pub fn into_parts(self) -> (Vec<String>, MergeStats) {
        (self.lines, self.stats)
    }
}

/// Normalized key used to compare feedback lines.
///
/// Trimmed and lowercased; an empty key means the line carries no content.
pub fn dedup_key(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Splits pasted free text into trimmed, non-empty lines.
pub fn split_text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Merges free-text lines and CSV lines.
///
/// Text lines come first. Lines are compared by [`dedup_key`]; the first
/// occurrence wins and is kept in its trimmed form. The result is capped at
/// [`MAX_MERGED_LINES`].
///
/// # Examples
///
/// ```
/// use sift::ingest::merge_inputs;
///
/// let text = vec!["Hello".to_string(), "hello ".to_string(), "World".to_string()];
/// let csv = vec!["world".to_string(), "Foo".to_string()];
/// let merged = merge_inputs(&text, &csv);
///
/// assert_eq!(merged.lines(), &["Hello", "World", "Foo"]);
/// assert!(!merged.stats().capped);
/// ```
pub fn merge_inputs(text_lines: &[String], csv_lines: &[String]) -> MergeResult {
    let non_empty = |lines: &[String]| lines.iter().filter(|l| !l.trim().is_empty()).count();

    let mut seen = HashSet::new();
    let mut unique: Vec<String> = text_lines
        .iter()
        .chain(csv_lines)
        .filter_map(|line| {
            let key = dedup_key(line);
            (!key.is_empty() && seen.insert(key)).then(|| line.trim().to_string())
        })
        .collect();

    let total_before_cap = unique.len();
    let capped = total_before_cap > MAX_MERGED_LINES;
    unique.truncate(MAX_MERGED_LINES);

    MergeResult {
        stats: MergeStats {
            text_count: non_empty(text_lines),
            csv_count: non_empty(csv_lines),
            unique_count: unique.len(),
            capped,
            total_before_cap,
        },
        lines: unique,
    }
}
