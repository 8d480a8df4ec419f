//! Theme extraction and labeling.
//!
//! [`ThemeExtractor`] asks a remote clustering service to group feedback into
//! themes. Whenever that fails, for whatever reason, it quietly switches to a
//! deterministic keyword classifier so an analysis always yields themes.
//! [`tag_themes`] then labels each theme with impact and effort levels.
//!
//! # Examples
//!
//! ```
//! use sift::themes::{ThemeExtractor, tag_themes};
//!
//! # fn main() -> Result<(), sift::FeedbackError> {
//! let lines = vec![
//!     "App crashes on load".to_string(),
//!     "Frequent crashes reported".to_string(),
//!     "Settings page is confusing".to_string(),
//! ];
//!
//! // Without a service the extractor uses the keyword classifier directly.
//! let mut themes = ThemeExtractor::offline().extract(&lines)?;
//! tag_themes(&mut themes);
//!
//! assert_eq!(themes[0].title(), "Performance and Stability Concerns");
//! assert!(themes[0].impact().is_some());
//! # Ok(())
//! # }
//! ```

mod extractor;
mod fallback;
mod impact;

pub use extractor::{MIN_ANALYSIS_LINES, ThemeExtractor, ThemeExtractorBuilder, build_prompt};
pub use fallback::classify_by_keywords;
pub use impact::{classify_effort, classify_impact, tag_theme, tag_themes};

/// Upper bound on themes produced by either extraction path.
pub const MAX_THEMES: usize = 5;
