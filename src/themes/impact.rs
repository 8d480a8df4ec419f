use crate::models::{Level, Theme};

const HIGH_IMPACT: &[&str] = &[
    "crash",
    "broken",
    "fail",
    "error",
    "critical",
    "urgent",
    "blocker",
    "security",
    "data loss",
    "outage",
];
const LOW_IMPACT: &[&str] = &[
    "nice",
    "would love",
    "wish",
    "suggestion",
    "prefer",
    "minor",
    "cosmetic",
];
const MED_IMPACT: &[&str] = &[
    "slow",
    "confusing",
    "difficult",
    "frustrat",
    "annoying",
    "request",
    "missing",
];

const HIGH_EFFORT: &[&str] = &[
    "rebuild",
    "redesign",
    "overhaul",
    "rewrite",
    "architecture",
    "migrat",
    "infrastructure",
    "platform",
];
const LOW_EFFORT: &[&str] = &[
    "fix",
    "update",
    "tweak",
    "adjust",
    "typo",
    "wording",
    "label",
    "color",
];
const MED_EFFORT: &[&str] = &[
    "add",
    "implement",
    "integrat",
    "build",
    "extend",
    "support",
    "export",
];

/// Checks High, then Low, then Med. The first list with a hit wins.
fn classify(text: &str, high: &[&str], low: &[&str], med: &[&str]) -> Level {
    let text = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|kw| text.contains(kw));

    [(high, Level::High), (low, Level::Low), (med, Level::Med)]
        .into_iter()
        .find(|(keywords, _)| hit(keywords))
        .map_or(Level::Med, |(_, level)| level)
}

/// Impact level for a piece of theme text. Defaults to [`Level::Med`].
///
/// ```
/// use sift::models::Level;
/// use sift::themes::classify_impact;
///
/// assert_eq!(classify_impact("The app has a critical security issue"), Level::High);
/// assert_eq!(classify_impact("A nice to have"), Level::Low);
/// ```
pub fn classify_impact(text: &str) -> Level {
    classify(text, HIGH_IMPACT, LOW_IMPACT, MED_IMPACT)
}

/// Effort level for a piece of theme text. Defaults to [`Level::Med`].
pub fn classify_effort(text: &str) -> Level {
    classify(text, HIGH_EFFORT, LOW_EFFORT, MED_EFFORT)
}

/// Labels one theme from its generated title and summary.
pub fn tag_theme(theme: &mut Theme) {
    let text = format!("{} {}", theme.title(), theme.summary());
    theme.set_labels(classify_impact(&text), classify_effort(&text));
}

pub fn tag_themes(themes: &mut [Theme]) {
    themes.iter_mut().for_each(tag_theme);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(title: &str, summary: &str) -> Theme {
        Theme::new(title, summary, vec!["q1".into(), "q2".into()])
    }

    #[test]
    fn critical_security_summary_is_high_impact() {
        let mut t = theme("Account safety", "The app has a critical security issue");
        tag_theme(&mut t);
        assert_eq!(t.impact(), Some(Level::High));
    }

    #[test]
    fn high_beats_low_when_both_present() {
        assert_eq!(
            classify_impact("Minor crash when closing the window"),
            Level::High
        );
    }

    #[test]
    fn low_beats_med_when_both_present() {
        assert_eq!(
            classify_impact("Would love fewer slow screens"),
            Level::Low
        );
    }

    #[test]
    fn impact_defaults_to_med() {
        assert_eq!(classify_impact("Pricing page wording"), Level::Med);
        assert_eq!(classify_impact(""), Level::Med);
    }

    #[test]
    fn impact_matching_ignores_case() {
        assert_eq!(classify_impact("URGENT: BLOCKER"), Level::High);
    }

    #[test]
    fn effort_tiers() {
        assert_eq!(classify_effort("Redesign the onboarding flow"), Level::High);
        assert_eq!(classify_effort("Fix the typo on the pricing page"), Level::Low);
        assert_eq!(classify_effort("Implement calendar sync"), Level::Med);
        assert_eq!(classify_effort("General feedback"), Level::Med);
    }

    #[test]
    fn effort_high_beats_low() {
        assert_eq!(
            classify_effort("Rebuild the editor to fix the lag"),
            Level::High
        );
    }

    #[test]
    fn effort_low_beats_med() {
        assert_eq!(
            classify_effort("Update the export button"),
            Level::Low
        );
    }

    #[test]
    fn tag_uses_title_and_summary() {
        let mut t = theme("Crash reports", "Users lose work");
        tag_theme(&mut t);
        assert_eq!(t.impact(), Some(Level::High));

        let mut t = theme("Small polish", "A nice suggestion for the tweak menu");
        tag_theme(&mut t);
        assert_eq!(t.impact(), Some(Level::Low));
        assert_eq!(t.effort(), Some(Level::Low));
    }

    #[test]
    fn tag_uses_generated_title_not_custom_title() {
        let mut t = theme("Pricing questions", "Users ask about plans");
        t.rename("Critical crash blocker");
        tag_theme(&mut t);
        assert_eq!(t.impact(), Some(Level::Med));
    }

    #[test]
    fn tag_themes_labels_every_theme() {
        let mut themes = vec![
            theme("Crashes", "App fails to start"),
            theme("Wishlist", "Nice extras"),
        ];
        tag_themes(&mut themes);
        assert_eq!(themes[0].impact(), Some(Level::High));
        assert_eq!(themes[1].impact(), Some(Level::Low));
        assert!(themes.iter().all(|t| t.effort().is_some()));
    }
}
