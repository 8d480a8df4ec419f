//! Renderers for a finished theme set.
//!
//! Both formats are pure functions of their inputs. The Markdown renderer takes
//! its timestamp as an argument so repeated exports can be compared.

mod labeled_csv;
mod markdown;

pub use labeled_csv::{LABELED_CSV_HEADER, render_labeled_csv};
pub use markdown::render_markdown;

use std::fmt;
use std::str::FromStr;

/// Output format accepted by the `export` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}' (expected markdown or csv)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_aliases() {
        assert_eq!("markdown".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!("MD".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!(" csv ".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
    }

    #[test]
    fn format_rejects_unknown() {
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(err.contains("pdf"));
    }

    #[test]
    fn format_display_round_trips() {
        for format in [ExportFormat::Markdown, ExportFormat::Csv] {
            assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
        }
    }
}
