use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use sift::export::ExportFormat;
use sift::ingest::split_text_lines;
use sift::utils::{ensure_database_directory, get_database_path, read_text_input};
use sift::{
    AnalysisRun, AnalysisService, Database, FeedbackError, Level, LlmClientBuilder, ThemeExtractor,
};
use time::OffsetDateTime;
use tracing::warn;

/// sift - group customer feedback into themes
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Turn raw customer feedback into prioritized themes")]
#[command(version)]
struct Cli {
    /// Database file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Analyze feedback from pasted text and/or a CSV file
    Analyze(AnalyzeCommand),
    /// Show how a CSV file is parsed and which column would be used
    Columns(ColumnsCommand),
    /// Show the latest analysis
    Show,
    /// Give a theme of the latest analysis a custom title
    Rename(RenameCommand),
    /// Restore a theme's generated title
    ResetTitle(ResetTitleCommand),
    /// Export the latest analysis
    Export(ExportCommand),
}

#[derive(Parser)]
#[command(group(ArgGroup::new("input").required(true).multiple(true).args(["text", "csv"])))]
struct AnalyzeCommand {
    /// File with one feedback item per line, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    text: Option<PathBuf>,

    /// CSV file holding a feedback column
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Name of the CSV column to analyze
    #[arg(long, value_name = "NAME", requires = "csv")]
    column: Option<String>,

    /// Skip the clustering service and use the keyword classifier
    #[arg(long)]
    offline: bool,

    /// Clustering model (overrides OLLAMA_MODEL)
    #[arg(long, value_name = "NAME")]
    model: Option<String>,
}

#[derive(Parser)]
struct ColumnsCommand {
    /// CSV file to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Parser)]
struct RenameCommand {
    /// Theme number as shown by `sift show`
    #[arg(value_name = "N")]
    number: usize,

    /// New title; an empty title restores the generated one
    #[arg(value_name = "TITLE")]
    title: String,
}

#[derive(Parser)]
struct ResetTitleCommand {
    /// Theme number as shown by `sift show`
    #[arg(value_name = "N")]
    number: usize,
}

#[derive(Parser)]
struct ExportCommand {
    /// Output format: markdown or csv
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Logs go to stderr so exports written to stdout stay clean.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("sift=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// User errors are bad input the user can correct; everything else is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<FeedbackError>()
            .is_some_and(FeedbackError::is_user_error)
    })
}

fn run(cli: &Cli) -> Result<()> {
    let service = open_service(cli.db.as_deref())?;
    let mut out = std::io::stdout().lock();

    match &cli.command {
        Commands::Analyze(cmd) => execute_analyze(&service, cmd, &mut out),
        Commands::Columns(cmd) => execute_columns(&service, &cmd.file, &mut out),
        Commands::Show => execute_show(&service, &mut out),
        Commands::Rename(cmd) => execute_rename(&service, cmd.number, &cmd.title, &mut out),
        Commands::ResetTitle(cmd) => execute_reset_title(&service, cmd.number, &mut out),
        Commands::Export(cmd) => {
            execute_export(&service, cmd.format, cmd.output.as_deref(), &mut out)
        }
    }
}

fn open_service(db_path: Option<&Path>) -> Result<AnalysisService> {
    let db_path = match db_path {
        Some(path) => path.to_path_buf(),
        None => get_database_path()?,
    };
    ensure_database_directory(&db_path)?;
    let db = Database::open(&db_path).context("Failed to open database")?;
    Ok(AnalysisService::new(db))
}

/// Builds the extractor for `analyze`.
///
/// A client that cannot be configured leads to the keyword classifier, the
/// same as a client that fails at request time.
fn build_extractor(offline: bool, model: Option<&str>) -> ThemeExtractor {
    if offline {
        return ThemeExtractor::offline();
    }

    let mut builder = LlmClientBuilder::new();
    if let Some(model) = model {
        builder = builder.model(model);
    }

    match builder.build() {
        Ok(client) => ThemeExtractor::new(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "clustering client unavailable, using keyword classifier");
            ThemeExtractor::offline()
        }
    }
}

fn execute_analyze(
    service: &AnalysisService,
    cmd: &AnalyzeCommand,
    out: &mut impl Write,
) -> Result<()> {
    let text_lines = match &cmd.text {
        Some(path) => split_text_lines(&read_text_input(path)?),
        None => Vec::new(),
    };

    let csv_lines = match &cmd.csv {
        Some(path) => {
            let selection = service.load_csv(path, cmd.column.as_deref())?;
            writeln!(
                out,
                "Using column '{}' ({})",
                selection.column_name(),
                selection.choice().source
            )?;
            selection.lines().to_vec()
        }
        None => Vec::new(),
    };

    let extractor = build_extractor(cmd.offline, cmd.model.as_deref());
    let run = service.analyze(&text_lines, &csv_lines, &extractor)?;
    write_run(out, &run)
}

fn execute_columns(service: &AnalysisService, path: &Path, out: &mut impl Write) -> Result<()> {
    let selection = service.load_csv(path, None)?;
    let table = selection.table();

    writeln!(out, "Delimiter: '{}'", table.delimiter())?;
    writeln!(
        out,
        "Header row: {}",
        if table.has_header() { "yes" } else { "no" }
    )?;
    writeln!(out, "Data rows: {}", table.rows().len())?;
    writeln!(out, "Columns:")?;
    for (i, name) in selection.column_names().iter().enumerate() {
        let marker = if i == selection.choice().index { "*" } else { " " };
        writeln!(out, " {marker} {}. {name}", i + 1)?;
    }
    writeln!(
        out,
        "Would use '{}' ({}), {} non-empty lines",
        selection.column_name(),
        selection.choice().source,
        selection.extraction().non_empty_count()
    )?;
    Ok(())
}

fn execute_show(service: &AnalysisService, out: &mut impl Write) -> Result<()> {
    let run = service.latest_run()?.ok_or(FeedbackError::NoAnalysis)?;
    write_run(out, &run)
}

fn execute_rename(
    service: &AnalysisService,
    number: usize,
    title: &str,
    out: &mut impl Write,
) -> Result<()> {
    let theme = service.rename_theme(number, title)?;
    match theme.custom_title() {
        Some(custom) => writeln!(out, "Theme {number} renamed to '{custom}'")?,
        None => writeln!(out, "Theme {number} title reset to '{}'", theme.title())?,
    }
    Ok(())
}

fn execute_reset_title(
    service: &AnalysisService,
    number: usize,
    out: &mut impl Write,
) -> Result<()> {
    let theme = service.reset_theme_title(number)?;
    writeln!(out, "Theme {number} title reset to '{}'", theme.title())?;
    Ok(())
}

fn execute_export(
    service: &AnalysisService,
    format: ExportFormat,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let content = service.export_latest(format, OffsetDateTime::now_utc())?;

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            writeln!(out, "Exported {format} to {}", path.display())?;
        }
        None => out.write_all(content.as_bytes())?,
    }
    Ok(())
}

fn level_label(level: Option<Level>) -> String {
    level.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn write_run(out: &mut impl Write, run: &AnalysisRun) -> Result<()> {
    let stats = run.stats();
    write!(
        out,
        "Analyzed {} unique lines (text: {}, csv: {})",
        stats.unique_count, stats.text_count, stats.csv_count
    )?;
    if stats.capped {
        write!(
            out,
            ", showing {} of {}",
            stats.unique_count, stats.total_before_cap
        )?;
    }
    writeln!(out)?;

    for (i, theme) in run.themes().iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "{}. {} [impact: {}, effort: {}]",
            i + 1,
            theme.display_title(),
            level_label(theme.impact()),
            level_label(theme.effort())
        )?;
        if !theme.summary().is_empty() {
            writeln!(out, "   {}", theme.summary())?;
        }
        for quote in theme.quotes() {
            writeln!(out, "   - \"{quote}\"")?;
        }
    }
    Ok(())
}
