//! Feedback ingestion: CSV parsing, column selection and input merging.
//!
//! Everything in this module is pure and deterministic. The only I/O is
//! [`read_csv_file`], which validates a file before reading it.
//!
//! # Examples
//!
//! ```
//! use sift::ingest::{extract_column, guess_feedback_column, merge_inputs, parse_table};
//!
//! # fn main() -> Result<(), sift::FeedbackError> {
//! let csv = "id,comment\n1,The export button is hard to find\n2,Loading takes forever";
//! let table = parse_table(csv)?;
//! let column = guess_feedback_column(table.headers(), table.rows());
//! let extraction = extract_column(&table, column);
//!
//! let merged = merge_inputs(&["Loading takes forever".to_string()], extraction.lines());
//! assert_eq!(merged.lines().len(), 2);
//! # Ok(())
//! # }
//! ```

mod columns;
mod merge;
mod parser;
mod upload;

pub use columns::{ExtractionResult, column_names, extract_column, guess_feedback_column, score_columns};
pub use merge::{MAX_MERGED_LINES, MergeResult, MergeStats, dedup_key, merge_inputs, split_text_lines};
pub use parser::{Delimiter, ParsedTable, detect_delimiter, parse_table, split_lines, tokenize_line};
pub use upload::{MAX_UPLOAD_BYTES, read_csv_file, validate_upload};
