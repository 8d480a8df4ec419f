use serde::{Deserialize, Serialize};

use super::Level;

/// A cluster of feedback lines with a title, summary and representative quotes.
///
/// The generated title is never overwritten. A user rename sets a custom
/// title that takes precedence for display and export until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    title: String,
    summary: String,
    quotes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    impact: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effort: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_title: Option<String>,
}

impl Theme {
    /// Creates an untagged theme without a custom title.
    ///
    /// # Examples
    ///
    /// ```
    /// use sift::Theme;
    ///
    /// let theme = Theme::new("Slow page loads", "Pages take long to open.", vec![
    ///     "Dashboard is slow".to_string(),
    /// ]);
    /// assert_eq!(theme.display_title(), "Slow page loads");
    /// assert!(theme.impact().is_none());
    /// ```
    pub fn new(title: impl Into<String>, summary: impl Into<String>, quotes: Vec<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            quotes,
            impact: None,
            effort: None,
            custom_title: None,
        }
    }

    /// Returns the generated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn impact(&self) -> Option<Level> {
        self.impact
    }

    pub fn effort(&self) -> Option<Level> {
        self.effort
    }

    /// Returns the user-supplied title, if one is set.
    pub fn custom_title(&self) -> Option<&str> {
        self.custom_title.as_deref()
    }

    /// Returns the title to show: the custom title if set, else the generated one.
    pub fn display_title(&self) -> &str {
        self.custom_title.as_deref().unwrap_or(&self.title)
    }

    /// Sets the impact and effort labels.
    pub fn set_labels(&mut self, impact: Level, effort: Level) {
        self.impact = Some(impact);
        self.effort = Some(effort);
    }

    /// Overrides the display title.
    ///
    /// A blank title clears the override instead of setting an empty one.
    pub fn rename(&mut self, custom_title: &str) {
        let trimmed = custom_title.trim();
        self.custom_title = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Clears the custom title so the generated title is shown again.
    pub fn reset_title(&mut self) {
        self.custom_title = None;
    }
}
