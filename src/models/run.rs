use time::OffsetDateTime;

use super::{RunId, Theme};
use crate::ingest::MergeStats;

/// A saved analysis: the merged feedback lines and the themes found in them.
///
/// A new analysis always produces a new run; theme sets are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    id: RunId,
    created_at: OffsetDateTime,
    lines: Vec<String>,
    stats: MergeStats,
    themes: Vec<Theme>,
}

impl AnalysisRun {
    pub fn new(
        id: RunId,
        created_at: OffsetDateTime,
        lines: Vec<String>,
        stats: MergeStats,
        themes: Vec<Theme>,
    ) -> Self {
        Self {
            id,
            created_at,
            lines,
            stats,
            themes,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns the merged feedback lines the themes were extracted from.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Returns the theme with the given 1-based number.
    pub fn theme_mut(&mut self, number: usize) -> Option<&mut Theme> {
        number
            .checked_sub(1)
            .and_then(|index| self.themes.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with_themes(count: usize) -> AnalysisRun {
        let themes = (1..=count)
            .map(|n| Theme::new(format!("Theme {n}"), "summary", vec![]))
            .collect();
        AnalysisRun::new(
            RunId::new(1),
            OffsetDateTime::UNIX_EPOCH,
            vec!["line".to_string()],
            MergeStats::default(),
            themes,
        )
    }

    #[test]
    fn theme_mut_uses_one_based_numbers() {
        let mut run = run_with_themes(2);
        assert_eq!(run.theme_mut(1).unwrap().title(), "Theme 1");
        assert_eq!(run.theme_mut(2).unwrap().title(), "Theme 2");
        assert!(run.theme_mut(0).is_none());
        assert!(run.theme_mut(3).is_none());
    }
}
