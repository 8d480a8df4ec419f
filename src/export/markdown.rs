use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::{Level, Theme};

fn level_label(level: Option<Level>) -> String {
    level.map_or_else(|| "Unrated".to_string(), |l| l.to_string())
}

/// Renders themes as a Markdown document with a front-matter block.
///
/// Each theme becomes a `##` section headed by its display title, followed by
/// an impact/effort line, the summary and a bulleted list of quotes.
///
/// # Examples
///
/// ```
/// use sift::Theme;
/// use sift::export::render_markdown;
/// use time::macros::datetime;
///
/// let themes = vec![Theme::new("Slow loads", "Pages open slowly.", vec![
///     "Dashboard is slow".to_string(),
/// ])];
/// let doc = render_markdown(&themes, datetime!(2024-05-01 12:00 UTC));
///
/// assert!(doc.starts_with("---\ngenerated_by: sift\ntheme_count: 1\n"));
/// assert!(doc.contains("## 1. Slow loads"));
/// assert!(doc.contains("- \"Dashboard is slow\""));
/// ```
pub fn render_markdown(themes: &[Theme], generated_at: OffsetDateTime) -> String {
    // Rfc3339 only fails for offsets with seconds or years outside 0..=9999.
    let date = generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| generated_at.unix_timestamp().to_string());

    let mut out = format!(
        "---\ngenerated_by: sift\ntheme_count: {}\ndate: {date}\n---\n\n# Feedback Themes\n",
        themes.len()
    );

    for (i, theme) in themes.iter().enumerate() {
        out.push_str(&format!("\n## {}. {}\n\n", i + 1, theme.display_title()));
        out.push_str(&format!(
            "**Impact:** {} | **Effort:** {}\n\n",
            level_label(theme.impact()),
            level_label(theme.effort())
        ));
        out.push_str(theme.summary());
        out.push_str("\n\n");
        for quote in theme.quotes() {
            out.push_str(&format!("- \"{quote}\"\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_themes() -> Vec<Theme> {
        let mut crashes = Theme::new(
            "Crashes on startup",
            "The app crashes when opened.",
            vec!["App crashes on load".into(), "Crashed twice today".into()],
        );
        crashes.set_labels(Level::High, Level::Med);

        let pricing = Theme::new(
            "Pricing clarity",
            "Plans are hard to compare.",
            vec!["Which plan do I need?".into()],
        );

        vec![crashes, pricing]
    }

    #[test]
    fn front_matter_has_count_and_rfc3339_date() {
        let doc = render_markdown(&sample_themes(), datetime!(2024-05-01 12:30:00 UTC));

        assert!(doc.starts_with(
            "---\ngenerated_by: sift\ntheme_count: 2\ndate: 2024-05-01T12:30:00Z\n---\n"
        ));
    }

    #[test]
    fn full_document_layout() {
        let doc = render_markdown(&sample_themes()[..1], datetime!(2024-05-01 12:30:00 UTC));

        assert_eq!(
            doc,
            "---\ngenerated_by: sift\ntheme_count: 1\ndate: 2024-05-01T12:30:00Z\n---\n\n\
             # Feedback Themes\n\n\
             ## 1. Crashes on startup\n\n\
             **Impact:** High | **Effort:** Med\n\n\
             The app crashes when opened.\n\n\
             - \"App crashes on load\"\n\
             - \"Crashed twice today\"\n"
        );
    }

    #[test]
    fn sections_include_labels_and_quotes() {
        let doc = render_markdown(&sample_themes(), datetime!(2024-05-01 12:30:00 UTC));

        assert!(doc.contains("## 1. Crashes on startup\n"));
        assert!(doc.contains("**Impact:** High | **Effort:** Med"));
        assert!(doc.contains("- \"App crashes on load\"\n- \"Crashed twice today\"\n"));
        assert!(doc.contains("## 2. Pricing clarity\n"));
        assert!(doc.contains("**Impact:** Unrated | **Effort:** Unrated"));
    }

    #[test]
    fn custom_title_is_used_for_heading() {
        let mut themes = sample_themes();
        themes[1].rename("Plan confusion");
        let doc = render_markdown(&themes, datetime!(2024-05-01 12:30:00 UTC));

        assert!(doc.contains("## 2. Plan confusion\n"));
        assert!(!doc.contains("Pricing clarity"));
    }

    #[test]
    fn empty_theme_set_still_has_front_matter() {
        let doc = render_markdown(&[], datetime!(2024-05-01 0:00 UTC));
        assert!(doc.contains("theme_count: 0"));
        assert!(!doc.contains("## "));
    }

    #[test]
    fn output_is_stable_for_fixed_timestamp() {
        let at = datetime!(2024-05-01 12:30:00 +02:00);
        let first = render_markdown(&sample_themes(), at);
        let second = render_markdown(&sample_themes(), at);
        assert_eq!(first, second);
        assert!(first.contains("date: 2024-05-01T12:30:00+02:00"));
    }
}
