//! Theme extraction through the clustering service, with keyword fallback.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::MAX_THEMES;
use super::fallback::classify_by_keywords;
use crate::error::FeedbackError;
use crate::llm::{ClusteringService, LlmError};
use crate::models::Theme;

/// Fewest non-empty feedback lines an analysis accepts.
pub const MIN_ANALYSIS_LINES: usize = 3;

/// Prompt template for theme extraction.
///
/// `{lines}` is replaced by the feedback, one numbered line per item.
const PROMPT_TEMPLATE: &str = r#"You are analyzing product feedback. Group the feedback items below into 3-5 themes.

For each theme provide:
1. "title": a short title of 3-6 words
2. "summary": one sentence of at most 25 words describing the theme
3. "quotes": 2-4 feedback items copied VERBATIM from the list below (without their numbers)

Return ONLY a JSON array of objects with the keys "title", "summary" and "quotes". Do not include any explanatory text.

EXAMPLE:
[{"title": "Slow Dashboard Loading", "summary": "Users wait too long for the dashboard to load.", "quotes": ["Dashboard takes forever", "Loading is slow in the morning"]}]

FEEDBACK:
{lines}

JSON OUTPUT:"#;

/// One theme as returned by the clustering service.
#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    quotes: Vec<String>,
}

/// Builder for constructing `ThemeExtractor` instances.
///
/// Leaving the service unset builds an offline extractor that always uses
/// the keyword classifier.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use sift::llm::LlmClientBuilder;
/// use sift::themes::ThemeExtractorBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LlmClientBuilder::new().build()?;
/// let extractor = ThemeExtractorBuilder::new()
///     .service(Arc::new(client))
///     .build();
/// let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let _themes = extractor.extract(&lines)?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ThemeExtractorBuilder {
    service: Option<Arc<dyn ClusteringService>>,
}

impl ThemeExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clustering service to call before falling back.
    pub fn service(mut self, service: Arc<dyn ClusteringService>) -> Self {
        self.service = Some(service);
        self
    }

    #[must_use]
    pub fn build(self) -> ThemeExtractor {
        ThemeExtractor {
            service: self.service,
        }
    }
}

/// Turns feedback lines into themes.
///
/// One call runs `Requesting → Succeeded` or `Requesting → FallingBack →
/// Succeeded`. The remote call is attempted once; network errors, bad
/// status codes and unusable responses all lead to the keyword classifier,
/// and the caller cannot tell which path produced the themes.
pub struct ThemeExtractor {
    service: Option<Arc<dyn ClusteringService>>,
}

impl ThemeExtractor {
    /// Creates an extractor backed by the given clustering service.
    #[must_use]
    pub fn new(service: Arc<dyn ClusteringService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// Creates an extractor that never touches the network.
    #[must_use]
    pub fn offline() -> Self {
        Self { service: None }
    }

    /// Extracts up to five themes from the given lines.
    ///
    /// Blank lines are ignored. Themes come back untagged; see
    /// [`tag_themes`](super::tag_themes).
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::InsufficientInput`] when fewer than
    /// [`MIN_ANALYSIS_LINES`] non-empty lines are given. No other error is
    /// possible: remote failures are absorbed.
    pub fn extract(&self, lines: &[String]) -> Result<Vec<Theme>, FeedbackError> {
        let lines: Vec<&str> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() < MIN_ANALYSIS_LINES {
            return Err(FeedbackError::InsufficientInput {
                found: lines.len(),
                required: MIN_ANALYSIS_LINES,
            });
        }

        let Some(service) = &self.service else {
            debug!(lines = lines.len(), "no clustering service configured");
            return Ok(classify_by_keywords(&lines));
        };

        match request_themes(service.as_ref(), &lines) {
            Ok(themes) => {
                info!(themes = themes.len(), "clustering service returned themes");
                Ok(themes)
            }
            Err(e) => {
                warn!(error = %e, "clustering failed, using keyword classifier");
                Ok(classify_by_keywords(&lines))
            }
        }
    }
}

/// Builds the clustering prompt, numbering lines from 1.
pub fn build_prompt(lines: &[&str]) -> String {
    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    PROMPT_TEMPLATE.replace("{lines}", &numbered)
}

fn request_themes(service: &dyn ClusteringService, lines: &[&str]) -> Result<Vec<Theme>, LlmError> {
    let prompt = build_prompt(lines);
    let response = service.generate(&prompt)?;

    let raw = first_theme_array(&response).ok_or_else(|| LlmError::Api {
        message: "No JSON theme array found in response".to_string(),
    })?;

    into_themes(raw)
}

/// Finds the first JSON array of theme objects in a model response.
///
/// Each `[` is tried in order and parsing stops at the end of the array, so
/// prose and markdown fences on either side are ignored even when they
/// contain brackets of their own.
fn first_theme_array(response: &str) -> Option<Vec<RawTheme>> {
    response.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&response[start..])
            .into_iter::<Vec<RawTheme>>()
            .next()?
            .ok()
    })
}

/// Converts the service's theme array, dropping entries without a title.
fn into_themes(raw: Vec<RawTheme>) -> Result<Vec<Theme>, LlmError> {
    let themes: Vec<Theme> = raw
        .into_iter()
        .filter(|theme| !theme.title.trim().is_empty())
        .take(MAX_THEMES)
        .map(|theme| {
            let quotes = theme
                .quotes
                .iter()
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .map(String::from)
                .collect();
            Theme::new(theme.title.trim(), theme.summary.trim(), quotes)
        })
        .collect();

    if themes.is_empty() {
        return Err(LlmError::Api {
            message: "Response contained no usable themes".to_string(),
        });
    }

    Ok(themes)
}
