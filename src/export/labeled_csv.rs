use crate::ingest::dedup_key;
use crate::models::Theme;

pub const LABELED_CSV_HEADER: &str = "original_text,theme_title";

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Pairs every feedback line with the theme that quotes it.
///
/// A line matches a theme when its trimmed, lowercased text equals one of the
/// theme's quotes under the same normalization. The first matching theme's
/// display title is used; lines no theme quotes are left out. Rows end with
/// `\n` and follow the order of `lines`.
///
/// # Examples
///
/// ```
/// use sift::Theme;
/// use sift::export::render_labeled_csv;
///
/// let lines = vec!["Dashboard is \"slow\"".to_string(), "Unrelated".to_string()];
/// let themes = vec![Theme::new("Speed", "", vec!["dashboard is \"slow\"".to_string()])];
///
/// assert_eq!(
///     render_labeled_csv(&lines, &themes),
///     "original_text,theme_title\n\"Dashboard is \"\"slow\"\"\",\"Speed\"\n"
/// );
/// ```
pub fn render_labeled_csv(lines: &[String], themes: &[Theme]) -> String {
    let theme_keys: Vec<(Vec<String>, &str)> = themes
        .iter()
        .map(|theme| {
            let keys = theme.quotes().iter().map(|q| dedup_key(q)).collect();
            (keys, theme.display_title())
        })
        .collect();

    let mut out = String::from(LABELED_CSV_HEADER);
    out.push('\n');

    for line in lines {
        let key = dedup_key(line);
        if key.is_empty() {
            continue;
        }
        let label = theme_keys
            .iter()
            .find(|(keys, _)| keys.contains(&key))
            .map(|(_, title)| *title);

        if let Some(title) = label {
            out.push_str(&quote_field(line));
            out.push(',');
            out.push_str(&quote_field(title));
            out.push('\n');
        }
    }

    out
}
