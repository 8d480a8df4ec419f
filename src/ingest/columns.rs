//! Column scoring and extraction of feedback lines from a parsed table.

use super::parser::ParsedTable;

/// Number of leading data rows sampled when scoring columns.
const COLUMN_SAMPLE_ROWS: usize = 10;

const LENGTH_WEIGHT: f64 = 0.7;
const ALPHA_WEIGHT: f64 = 0.3;

/// Feedback lines pulled out of a single table column.
///
/// Produced fresh by every extraction; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    lines: Vec<String>,
    total_rows: usize,
    column_index: usize,
}

impl ExtractionResult {
    /// Returns the non-empty trimmed cell values, in row order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the result and returns its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Returns how many data rows were inspected.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Returns how many non-empty lines were produced.
    pub fn non_empty_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the column the lines were taken from.
    pub fn column_index(&self) -> usize {
        self.column_index
    }
}

/// Scores every header column by how much it looks like free-text feedback.
///
/// Score is `0.7 * average length + 0.3 * average alphabetic characters`
/// over the non-empty cells of the first ten rows. Columns with no non-empty
/// sampled cells score 0.
pub fn score_columns(headers: &[String], rows: &[Vec<String>]) -> Vec<f64> {
    let sample = &rows[..rows.len().min(COLUMN_SAMPLE_ROWS)];

    (0..headers.len())
        .map(|index| {
            let cells: Vec<&str> = sample
                .iter()
                .filter_map(|row| row.get(index))
                .map(String::as_str)
                .filter(|cell| !cell.is_empty())
                .collect();

            if cells.is_empty() {
                return 0.0;
            }

            let count = cells.len() as f64;
            let total_len: usize = cells.iter().map(|cell| cell.chars().count()).sum();
            let total_alpha: usize = cells
                .iter()
                .map(|cell| cell.chars().filter(|c| c.is_alphabetic()).count())
                .sum();

            LENGTH_WEIGHT * (total_len as f64 / count) + ALPHA_WEIGHT * (total_alpha as f64 / count)
        })
        .collect()
}

/// Guesses which column holds the feedback text.
///
/// Without headers the answer is always column 0. Ties go to the first column.
pub fn guess_feedback_column(headers: Option<&[String]>, rows: &[Vec<String>]) -> usize {
    let Some(headers) = headers else {
        return 0;
    };

    let mut best_index = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (index, score) in score_columns(headers, rows).into_iter().enumerate() {
        if score > best_score {
            best_index = index;
            best_score = score;
        }
    }
    best_index
}

/// Pulls the non-empty trimmed values of one column out of a table.
///
/// Rows too short to have the column are counted but contribute nothing.
pub fn extract_column(table: &ParsedTable, column_index: usize) -> ExtractionResult {
    let lines = table
        .rows()
        .iter()
        .filter_map(|row| row.get(column_index))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect();

    ExtractionResult {
        lines,
        total_rows: table.rows().len(),
        column_index,
    }
}

/// Returns display names for the table's columns.
///
/// Headerless tables get `Column 1`, `Column 2`, ... sized to the widest row.
pub fn column_names(table: &ParsedTable) -> Vec<String> {
    match table.headers() {
        Some(headers) => headers.to_vec(),
        None => {
            let width = table.rows().iter().map(Vec::len).max().unwrap_or(0);
            (1..=width).map(|n| format!("Column {n}")).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_table;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn selects_long_sentence_column_over_codes() {
        let headers = strings(&["feedback", "code"]);
        let rows = vec![
            strings(&["The dashboard takes ages to load every morning", "A1023"]),
            strings(&["I cannot find the export button anywhere", "B2201"]),
            strings(&["Please add a dark mode for late night work", "C3310"]),
        ];
        assert_eq!(guess_feedback_column(Some(&headers), &rows), 0);
    }

    #[test]
    fn selects_later_column_when_it_scores_higher() {
        let headers = strings(&["id", "date", "comment"]);
        let rows = vec![
            strings(&["1", "2024-01-01", "Search results are often irrelevant"]),
            strings(&["2", "2024-01-02", "Love the new onboarding flow"]),
        ];
        assert_eq!(guess_feedback_column(Some(&headers), &rows), 2);
    }

    #[test]
    fn no_headers_defaults_to_first_column() {
        let rows = vec![strings(&["1", "A much longer sentence of feedback"])];
        assert_eq!(guess_feedback_column(None, &rows), 0);
    }

    #[test]
    fn ties_go_to_first_column() {
        let headers = strings(&["a", "b"]);
        let rows = vec![strings(&["same", "same"])];
        assert_eq!(guess_feedback_column(Some(&headers), &rows), 0);
    }

    #[test]
    fn empty_columns_score_zero() {
        let headers = strings(&["empty", "text"]);
        let rows = vec![strings(&["", "ok"]), strings(&[""])];
        let scores = score_columns(&headers, &rows);
        assert_eq!(scores[0], 0.0);
        // "ok": length 2, alphabetic 2 -> 0.7 * 2 + 0.3 * 2
        assert!((scores[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn scoring_only_samples_first_ten_rows() {
        let headers = strings(&["short", "long"]);
        let mut rows: Vec<Vec<String>> = (0..10).map(|_| strings(&["abcdef", "x"])).collect();
        rows.extend((0..50).map(|_| strings(&["a", "a very long piece of text indeed"])));
        assert_eq!(guess_feedback_column(Some(&headers), &rows), 0);
    }

    #[test]
    fn headers_without_rows_pick_first_column() {
        let headers = strings(&["a", "b", "c"]);
        assert_eq!(guess_feedback_column(Some(&headers), &[]), 0);
    }

    #[test]
    fn extract_column_counts_rows_and_skips_empty_cells() {
        let table = parse_table("id,comment\n1,Too slow\n2,\n3\n4,  Crashes  ").unwrap();
        let result = extract_column(&table, 1);

        assert_eq!(result.lines(), &["Too slow".to_string(), "Crashes".to_string()]);
        assert_eq!(result.total_rows(), 4);
        assert_eq!(result.non_empty_count(), 2);
        assert_eq!(result.column_index(), 1);
    }

    #[test]
    fn column_names_for_headerless_table() {
        let table = parse_table("1,2\n3,4,5").unwrap();
        assert_eq!(
            column_names(&table),
            strings(&["Column 1", "Column 2", "Column 3"])
        );
    }
}
