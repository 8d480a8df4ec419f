//! User-facing error taxonomy for the feedback pipeline.
//!
//! Every variant here is shown to the user as a message and none of them are
//! fatal: the caller can retry with corrected input. Failures of the remote
//! clustering service are deliberately absent; they live in
//! [`LlmError`](crate::llm::LlmError) and never leave the theme extractor.

use thiserror::Error;

/// Errors surfaced by parsing, upload validation and analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    /// The input contained no usable (non-blank) lines.
    #[error("Input is empty: no usable lines found")]
    EmptyInput,

    /// An uploaded file exceeded the size limit.
    #[error("File is too large ({size} bytes); the limit is {limit} bytes")]
    OversizedFile { size: u64, limit: u64 },

    /// An uploaded file did not carry the expected extension.
    #[error("File '{name}' is not a .csv file")]
    WrongExtension { name: String },

    /// Fewer feedback lines than the analysis needs.
    #[error("Need at least {required} feedback lines to analyze, found {found}")]
    InsufficientInput { found: usize, required: usize },

    /// A column was requested by a name the CSV headers do not contain.
    #[error("Column '{name}' not found; available columns: {available}")]
    UnknownColumn { name: String, available: String },

    /// A command needs a saved analysis but none exists yet.
    #[error("No analysis found; run `sift analyze` first")]
    NoAnalysis,

    /// A theme number outside the latest analysis.
    #[error("Theme {number} does not exist; the latest analysis has {count} themes")]
    ThemeNotFound { number: usize, count: usize },
}

impl FeedbackError {
    /// Returns true for errors caused by the user's input rather than the system.
    ///
    /// All current variants are user errors; the CLI maps them to exit code 1.
    pub fn is_user_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_file_message_includes_sizes() {
        let err = FeedbackError::OversizedFile {
            size: 6_000_000,
            limit: 5_242_880,
        };
        let msg = err.to_string();
        assert!(msg.contains("6000000"));
        assert!(msg.contains("5242880"));
    }

    #[test]
    fn wrong_extension_message_names_file() {
        let err = FeedbackError::WrongExtension {
            name: "notes.txt".to_string(),
        };
        assert_eq!(err.to_string(), "File 'notes.txt' is not a .csv file");
    }

    #[test]
    fn insufficient_input_message_includes_counts() {
        let err = FeedbackError::InsufficientInput {
            found: 2,
            required: 3,
        };
        assert_eq!(
            err.to_string(),
            "Need at least 3 feedback lines to analyze, found 2"
        );
        assert!(err.is_user_error());
    }

    #[test]
    fn unknown_column_lists_alternatives() {
        let err = FeedbackError::UnknownColumn {
            name: "feedback".to_string(),
            available: "id, comment".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Column 'feedback' not found; available columns: id, comment"
        );
    }

    #[test]
    fn theme_not_found_reports_count() {
        let err = FeedbackError::ThemeNotFound { number: 7, count: 3 };
        assert!(err.to_string().contains("has 3 themes"));
    }

    #[test]
    fn errors_survive_anyhow_downcast() {
        let err: anyhow::Error = FeedbackError::NoAnalysis.into();
        assert_eq!(
            err.downcast_ref::<FeedbackError>(),
            Some(&FeedbackError::NoAnalysis)
        );
    }
}
