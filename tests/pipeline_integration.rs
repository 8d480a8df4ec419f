//! End-to-end runs of the feedback pipeline through the public API.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use sift::export::{render_labeled_csv, render_markdown};
use sift::ingest::{extract_column, guess_feedback_column, merge_inputs, parse_table, split_text_lines};
use sift::themes::{MAX_THEMES, tag_themes};
use sift::{ClusteringService, FeedbackError, Level, LlmError, ThemeExtractor};
use time::macros::datetime;

/// Records prompts and replays a fixed result.
struct ScriptedService {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl ClusteringService for ScriptedService {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Http { status: *status }),
        }
    }
}

const EXPORT_CSV: &str = "ticket;customer comment;rating\r\n\
T-1;\"Search is slow; takes 10s\";2\r\n\
T-2;The app crashes on load;1\r\n\
T-3;\"Please add \"\"dark mode\"\"\";4\r\n\
T-4;The app crashes on load;1\r\n\
\r\n\
T-5;Export to PDF would be nice;4\r\n";

fn csv_feedback() -> Vec<String> {
    let table = parse_table(EXPORT_CSV).unwrap();
    let column = guess_feedback_column(table.headers(), table.rows());
    extract_column(&table, column).into_lines()
}

#[test]
fn semicolon_export_is_parsed_and_column_picked() {
    let table = parse_table(EXPORT_CSV).unwrap();
    assert_eq!(table.delimiter().as_char(), ';');
    assert!(table.has_header());
    assert_eq!(table.rows().len(), 5);

    let lines = csv_feedback();
    assert_eq!(lines[0], "Search is slow; takes 10s");
    assert_eq!(lines[2], "Please add \"dark mode\"");
    assert_eq!(lines.len(), 5);
}

#[test]
fn merged_csv_and_text_feed_remote_extraction() -> Result<()> {
    let text = split_text_lines("Dashboard charts are confusing\n\nthe app crashes on load\n");
    let merged = merge_inputs(&text, &csv_feedback());

    assert_eq!(merged.stats().text_count, 2);
    assert_eq!(merged.stats().csv_count, 5);
    // Both CSV copies of the crash report repeat the pasted line.
    assert_eq!(merged.lines().len(), 5);
    assert_eq!(merged.lines()[1], "the app crashes on load");

    let service = ScriptedService::replying(
        r#"Here are the themes:
        [
          {"title": "App Stability", "summary": "Crashes on load block usage.",
           "quotes": ["the app crashes on load"]},
          {"title": "Search Speed", "summary": "Search is slow.",
           "quotes": ["Search is slow; takes 10s"]}
        ]
        Let me know if you need more."#,
    );
    let extractor = ThemeExtractor::new(service.clone());
    let mut themes = extractor.extract(merged.lines())?;
    tag_themes(&mut themes);

    assert_eq!(themes.len(), 2);
    assert_eq!(themes[0].impact(), Some(Level::High));

    let prompts = service.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("1. Dashboard charts are confusing"));
    assert!(prompts[0].contains("5. Export to PDF would be nice"));

    let csv = render_labeled_csv(merged.lines(), &themes);
    assert_eq!(
        csv,
        "original_text,theme_title\n\
         \"the app crashes on load\",\"App Stability\"\n\
         \"Search is slow; takes 10s\",\"Search Speed\"\n"
    );
    Ok(())
}

#[test]
fn failing_service_falls_back_once_without_error() -> Result<()> {
    let lines = split_text_lines(
        "App crashes on load\nFrequent crashes reported\nSettings page is confusing\n",
    );
    let service = ScriptedService::failing(503);
    let extractor = ThemeExtractor::new(service.clone());

    let themes = extractor.extract(&lines)?;
    assert_eq!(service.prompts.lock().unwrap().len(), 1);
    assert_eq!(themes, ThemeExtractor::offline().extract(&lines)?);
    assert_eq!(themes[0].title(), "Performance and Stability Concerns");
    Ok(())
}

#[test]
fn too_few_lines_fail_before_any_request() {
    let service = ScriptedService::replying("[]");
    let extractor = ThemeExtractor::new(service.clone());
    let merged = merge_inputs(&split_text_lines("Hello\nhello \n"), &[]);

    let result = extractor.extract(merged.lines());
    assert_eq!(
        result,
        Err(FeedbackError::InsufficientInput {
            found: 1,
            required: 3
        })
    );
    assert!(service.prompts.lock().unwrap().is_empty());
}

#[test]
fn large_input_is_capped_and_themed() -> Result<()> {
    let text: Vec<String> = (0..450).map(|i| format!("The page is slow, case {i}")).collect();
    let csv: Vec<String> = (0..150).map(|i| format!("Please add feature {i}")).collect();
    let merged = merge_inputs(&text, &csv);

    assert_eq!(merged.lines().len(), 500);
    assert!(merged.stats().capped);
    assert_eq!(merged.stats().total_before_cap, 600);

    let mut themes = ThemeExtractor::offline().extract(merged.lines())?;
    tag_themes(&mut themes);
    assert!(themes.len() <= MAX_THEMES);
    let titles: Vec<&str> = themes.iter().map(|t| t.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Performance and Stability Concerns",
            "Feature Requests and Enhancements"
        ]
    );
    Ok(())
}

#[test]
fn markdown_report_reflects_renames() -> Result<()> {
    let lines = split_text_lines("alpha\nbeta\ngamma\ndelta\n");
    let mut themes = ThemeExtractor::offline().extract(&lines)?;
    tag_themes(&mut themes);
    themes[0].rename("Greek letters");

    let doc = render_markdown(&themes, datetime!(2024-03-10 08:15:00 UTC));
    assert!(doc.contains("theme_count: 2"));
    assert!(doc.contains("date: 2024-03-10T08:15:00Z"));
    assert!(doc.contains("## 1. Greek letters"));
    assert!(doc.contains("## 2. Theme 2"));
    assert!(doc.contains("**Impact:** Med | **Effort:** Med"));
    Ok(())
}
