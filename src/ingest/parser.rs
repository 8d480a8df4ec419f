//! Line-oriented CSV parsing with delimiter and header detection.
//!
//! The tokenizer is intentionally small: quoted fields cannot span lines, and
//! content after a closing quote is kept verbatim instead of being rejected.

use std::fmt;

use crate::error::FeedbackError;

/// Number of leading lines inspected when detecting the delimiter.
const DELIMITER_SAMPLE_LINES: usize = 5;

/// Header cells must be strictly shorter than this many characters.
const MAX_HEADER_CELL_CHARS: usize = 50;

/// Field delimiter detected for a CSV document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    /// Returns the delimiter character.
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A parsed CSV document.
///
/// Rows are not required to have equal length. The header is only present
/// when the first row passed header detection; it is never part of `rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    rows: Vec<Vec<String>>,
    headers: Option<Vec<String>>,
    delimiter: Delimiter,
}

impl ParsedTable {
    /// Returns the data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the header row, if one was detected.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Returns the detected delimiter.
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Returns true if the first row was treated as a header.
    pub fn has_header(&self) -> bool {
        self.headers.is_some()
    }
}

/// Splits text into non-blank lines on LF or CRLF.
///
/// A lone CR is not a line break.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Picks the delimiter by counting commas and semicolons in the first lines.
///
/// Semicolon wins only when strictly more frequent; ties go to comma.
pub fn detect_delimiter(lines: &[&str]) -> Delimiter {
    let (commas, semicolons) = lines
        .iter()
        .take(DELIMITER_SAMPLE_LINES)
        .flat_map(|line| line.chars())
        .fold((0usize, 0usize), |(commas, semicolons), c| match c {
            ',' => (commas + 1, semicolons),
            ';' => (commas, semicolons + 1),
            _ => (commas, semicolons),
        });

    if semicolons > commas {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Splits one line into trimmed fields.
///
/// A `"` toggles quoting, except that `""` inside quotes emits a literal
/// quote. The delimiter only separates fields outside quotes.
///
/// # Examples
///
/// ```
/// use sift::ingest::{Delimiter, tokenize_line};
///
/// let fields = tokenize_line(r#""a,b","c""d",e"#, Delimiter::Comma);
/// assert_eq!(fields, vec!["a,b", "c\"d", "e"]);
/// ```
pub fn tokenize_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    let delimiter = delimiter.as_char();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Parses raw CSV text into a [`ParsedTable`].
///
/// # Errors
///
/// Returns [`FeedbackError::EmptyInput`] if the text has no non-blank lines.
pub fn parse_table(text: &str) -> Result<ParsedTable, FeedbackError> {
    let lines = split_lines(text);
    if lines.is_empty() {
        return Err(FeedbackError::EmptyInput);
    }

    let delimiter = detect_delimiter(&lines);
    let mut rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| tokenize_line(line, delimiter))
        .collect();

    let headers = if looks_like_header(&rows[0], rows.len()) {
        Some(rows.remove(0))
    } else {
        None
    };

    Ok(ParsedTable {
        rows,
        headers,
        delimiter,
    })
}

/// Decides whether the first row is a header.
fn looks_like_header(first_row: &[String], total_rows: usize) -> bool {
    total_rows > 1
        && first_row.iter().all(|cell| {
            !cell.is_empty()
                && cell.chars().count() < MAX_HEADER_CELL_CHARS
                && !cell.chars().all(|c| c.is_ascii_digit())
        })
}
