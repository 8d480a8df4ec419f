use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::OptionalExtension;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::db::SqlitePreferenceStore;
use crate::error::FeedbackError;
use crate::export::{ExportFormat, render_labeled_csv, render_markdown};
use crate::ingest::{
    ExtractionResult, MergeStats, ParsedTable, column_names, extract_column, merge_inputs,
    parse_table, read_csv_file,
};
use crate::models::{AnalysisRun, RunId, Theme};
use crate::preferences::{ColumnChoice, ColumnPreferences, ColumnSource, find_column};
use crate::themes::{ThemeExtractor, tag_themes};
use crate::Database;

/// A parsed CSV file together with the feedback column picked from it.
#[derive(Debug, Clone)]
pub struct CsvSelection {
    table: ParsedTable,
    column_names: Vec<String>,
    choice: ColumnChoice,
    extraction: ExtractionResult,
}

impl CsvSelection {
    pub fn table(&self) -> &ParsedTable {
        &self.table
    }

    /// Header names, or `Column N` labels for a headerless file.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn choice(&self) -> ColumnChoice {
        self.choice
    }

    /// Display name of the chosen column.
    pub fn column_name(&self) -> &str {
        self.column_names
            .get(self.choice.index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn extraction(&self) -> &ExtractionResult {
        &self.extraction
    }

    pub fn lines(&self) -> &[String] {
        self.extraction.lines()
    }
}

/// Service layer running analyses and managing saved runs.
///
/// AnalysisService owns a Database instance. Column preferences are read and
/// written through a [`SqlitePreferenceStore`] over the same database.
///
/// # Examples
///
/// ```
/// use sift::{AnalysisService, Database};
/// use sift::themes::ThemeExtractor;
///
/// # fn main() -> anyhow::Result<()> {
/// let service = AnalysisService::new(Database::in_memory()?);
/// let text = vec![
///     "App crashes on load".to_string(),
///     "Frequent crashes reported".to_string(),
///     "Settings page is confusing".to_string(),
/// ];
///
/// let run = service.analyze(&text, &[], &ThemeExtractor::offline())?;
/// assert_eq!(run.themes()[0].title(), "Performance and Stability Concerns");
/// assert_eq!(service.latest_run()?.map(|r| r.id()), Some(run.id()));
/// # Ok(())
/// # }
/// ```
pub struct AnalysisService {
    db: Database,
}

impl AnalysisService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Parses CSV text and picks its feedback column.
    ///
    /// An explicit `column` name wins and is remembered for this header set.
    /// Otherwise the remembered choice, the last selected column and finally
    /// the scoring heuristic are tried in that order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::EmptyInput`] for blank text and
    /// [`FeedbackError::UnknownColumn`] when `column` names no header.
    pub fn select_column(&self, text: &str, column: Option<&str>) -> Result<CsvSelection> {
        let table = parse_table(text)?;
        let names = column_names(&table);
        let store = SqlitePreferenceStore::new(&self.db);
        let prefs = ColumnPreferences::new(&store);

        let choice = match column {
            Some(name) => {
                let index = find_column(&names, name).ok_or_else(|| {
                    FeedbackError::UnknownColumn {
                        name: name.to_string(),
                        available: names.join(", "),
                    }
                })?;
                if let Some(headers) = table.headers() {
                    prefs.remember(headers, &names[index]);
                }
                ColumnChoice {
                    index,
                    source: ColumnSource::Explicit,
                }
            }
            None => prefs.resolve(table.headers(), table.rows()),
        };

        let extraction = extract_column(&table, choice.index);
        debug!(
            column = choice.index,
            source = %choice.source,
            rows = extraction.total_rows(),
            lines = extraction.non_empty_count(),
            "extracted feedback column"
        );

        Ok(CsvSelection {
            table,
            column_names: names,
            choice,
            extraction,
        })
    }

    /// Validates, reads and parses a CSV file, then picks its feedback column.
    ///
    /// # Errors
    ///
    /// Upload rejections ([`FeedbackError::WrongExtension`],
    /// [`FeedbackError::OversizedFile`]) happen before the file is read.
    pub fn load_csv(&self, path: &Path, column: Option<&str>) -> Result<CsvSelection> {
        let text = read_csv_file(path)?;
        self.select_column(&text, column)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Merges the inputs, extracts and tags themes, and saves the run.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::InsufficientInput`] when fewer than three
    /// unique lines remain after merging. Nothing is saved in that case.
    pub fn analyze(
        &self,
        text_lines: &[String],
        csv_lines: &[String],
        extractor: &ThemeExtractor,
    ) -> Result<AnalysisRun> {
        let (lines, stats) = merge_inputs(text_lines, csv_lines).into_parts();
        info!(
            unique = stats.unique_count,
            capped = stats.capped,
            total = stats.total_before_cap,
            "merged feedback"
        );

        let mut themes = extractor.extract(&lines)?;
        tag_themes(&mut themes);

        self.save_run(lines, stats, themes)
    }

    fn save_run(
        &self,
        lines: Vec<String>,
        stats: MergeStats,
        themes: Vec<Theme>,
    ) -> Result<AnalysisRun> {
        let conn = self.db.connection();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        conn.execute(
            "INSERT INTO analysis_runs (created_at, lines, stats, themes) VALUES (?1, ?2, ?3, ?4)",
            (
                now,
                serde_json::to_string(&lines)?,
                serde_json::to_string(&stats)?,
                serde_json::to_string(&themes)?,
            ),
        )
        .context("Failed to save analysis run")?;

        let id = RunId::new(conn.last_insert_rowid());
        info!(run = %id, themes = themes.len(), "saved analysis run");

        Ok(AnalysisRun::new(
            id,
            OffsetDateTime::from_unix_timestamp(now)?,
            lines,
            stats,
            themes,
        ))
    }

    /// Returns the most recent run, or `None` before the first analysis.
    pub fn latest_run(&self) -> Result<Option<AnalysisRun>> {
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT id, created_at, lines, stats, themes
                 FROM analysis_runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .context("Failed to load latest analysis run")?;

        let Some((id, created_at, lines, stats, themes)) = row else {
            return Ok(None);
        };

        Ok(Some(AnalysisRun::new(
            RunId::new(id),
            OffsetDateTime::from_unix_timestamp(created_at)?,
            serde_json::from_str(&lines).context("Corrupt lines in saved run")?,
            serde_json::from_str(&stats).context("Corrupt stats in saved run")?,
            serde_json::from_str(&themes).context("Corrupt themes in saved run")?,
        )))
    }

    fn require_latest_run(&self) -> Result<AnalysisRun> {
        self.latest_run()?
            .ok_or_else(|| FeedbackError::NoAnalysis.into())
    }

    /// Sets a custom title on theme `number` (1-based) of the latest run.
    ///
    /// A blank title clears the override. The generated title is kept.
    pub fn rename_theme(&self, number: usize, title: &str) -> Result<Theme> {
        self.update_theme(number, |theme| theme.rename(title))
    }

    /// Clears the custom title of theme `number` (1-based) in the latest run.
    pub fn reset_theme_title(&self, number: usize) -> Result<Theme> {
        self.update_theme(number, Theme::reset_title)
    }

    fn update_theme(&self, number: usize, change: impl FnOnce(&mut Theme)) -> Result<Theme> {
        let mut run = self.require_latest_run()?;
        let count = run.themes().len();
        let theme = run
            .theme_mut(number)
            .ok_or(FeedbackError::ThemeNotFound { number, count })?;
        change(theme);
        let updated = theme.clone();

        self.db
            .connection()
            .execute(
                "UPDATE analysis_runs SET themes = ?1 WHERE id = ?2",
                (serde_json::to_string(run.themes())?, run.id().get()),
            )
            .context("Failed to update themes")?;

        debug!(run = %run.id(), number, title = updated.display_title(), "updated theme");
        Ok(updated)
    }

    /// Renders the latest run in the requested format.
    ///
    /// `generated_at` is written into the Markdown front matter.
    pub fn export_latest(
        &self,
        format: ExportFormat,
        generated_at: OffsetDateTime,
    ) -> Result<String> {
        let run = self.require_latest_run()?;
        Ok(match format {
            ExportFormat::Markdown => render_markdown(run.themes(), generated_at),
            ExportFormat::Csv => render_labeled_csv(run.lines(), run.themes()),
        })
    }
}
