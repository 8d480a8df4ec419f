//! Deterministic, network-free theme classifier.
//!
//! Lines are matched against six fixed keyword buckets. Membership is
//! computed per line as a bitmask, so one line can feed several buckets.

use super::MAX_THEMES;
use crate::models::Theme;

/// A bucket needs at least this many matching lines to become a theme.
const MIN_BUCKET_MATCHES: usize = 2;

/// Quotes kept per fallback theme.
const QUOTES_PER_THEME: usize = 3;

/// Number of contiguous chunks used when no bucket qualifies.
const GENERIC_CHUNKS: usize = 3;

struct Bucket {
    title: &'static str,
    summary: &'static str,
    keywords: &'static [&'static str],
}

/// Evaluation order is output order.
const BUCKETS: [Bucket; 6] = [
    Bucket {
        title: "Usability and Ease of Use",
        summary: "Users find parts of the product hard to understand or navigate.",
        keywords: &[
            "confusing",
            "confused",
            "hard to",
            "difficult",
            "intuitive",
            "navigate",
            "navigation",
            "easy to use",
            "user-friendly",
            "unclear",
            "complicated",
        ],
    },
    Bucket {
        title: "Visual Design and Layout",
        summary: "Feedback about how the interface looks and how screens are laid out.",
        keywords: &[
            "design",
            "layout",
            "interface",
            "color",
            "colour",
            "font",
            "ugly",
            "beautiful",
            "clutter",
            "dark mode",
            "look and feel",
        ],
    },
    Bucket {
        title: "Performance and Stability Concerns",
        summary: "Users report slowness, crashes or instability that disrupt their work.",
        keywords: &[
            "slow",
            "lag",
            "crash",
            "freeze",
            "frozen",
            "performance",
            "speed",
            "load",
            "bug",
            "error",
            "timeout",
            "hang",
        ],
    },
    Bucket {
        title: "Feature Requests and Enhancements",
        summary: "Users are asking for new capabilities or extensions to existing ones.",
        keywords: &[
            "feature",
            "add ",
            "would love",
            "would like",
            "wish",
            "missing",
            "please add",
            "request",
            "integration",
            "integrate",
            "ability to",
        ],
    },
    Bucket {
        title: "Data Visualization and Reporting",
        summary: "Feedback on charts, dashboards and the way data is reported.",
        keywords: &[
            "chart",
            "graph",
            "dashboard",
            "visualiz",
            "visualis",
            "reporting",
            "analytics",
            "metrics",
            "export",
            "csv",
        ],
    },
    Bucket {
        title: "Support and Documentation",
        summary: "Users want better help resources, documentation or customer support.",
        keywords: &[
            "support",
            "help",
            "documentation",
            "docs",
            "tutorial",
            "guide",
            "onboarding",
            "customer service",
            "contact",
            "response time",
        ],
    },
];

/// Bitmask of the buckets a line matches; bit `i` is `BUCKETS[i]`.
fn bucket_mask(line: &str) -> u8 {
    let lower = line.to_lowercase();
    BUCKETS
        .iter()
        .enumerate()
        .filter(|(_, bucket)| bucket.keywords.iter().any(|kw| lower.contains(kw)))
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

/// Groups lines into themes without any network access.
///
/// Buckets with at least two matching lines become themes quoting their first
/// three matches. If no bucket qualifies, the lines are split into three
/// contiguous chunks instead. At most five themes are returned.
///
/// # Examples
///
/// ```
/// use sift::themes::classify_by_keywords;
///
/// let themes = classify_by_keywords(&["App crashes on load", "Frequent crashes reported"]);
/// assert_eq!(themes.len(), 1);
/// assert_eq!(themes[0].title(), "Performance and Stability Concerns");
/// ```
pub fn classify_by_keywords(lines: &[&str]) -> Vec<Theme> {
    let masks: Vec<u8> = lines.iter().map(|line| bucket_mask(line)).collect();

    let bucket_themes: Vec<Theme> = BUCKETS
        .iter()
        .enumerate()
        .filter_map(|(i, bucket)| {
            let matches: Vec<&str> = lines
                .iter()
                .zip(&masks)
                .filter(|(_, mask)| *mask & (1 << i) != 0)
                .map(|(line, _)| *line)
                .collect();

            (matches.len() >= MIN_BUCKET_MATCHES).then(|| {
                let quotes = matches
                    .iter()
                    .take(QUOTES_PER_THEME)
                    .map(|q| q.to_string())
                    .collect();
                Theme::new(bucket.title, bucket.summary, quotes)
            })
        })
        .collect();

    let mut themes = if bucket_themes.is_empty() {
        chunk_themes(lines)
    } else {
        bucket_themes
    };
    themes.truncate(MAX_THEMES);
    themes
}

/// Splits lines into up to three contiguous generic themes.
fn chunk_themes(lines: &[&str]) -> Vec<Theme> {
    if lines.is_empty() {
        return Vec::new();
    }

    let chunk_size = lines.len().div_ceil(GENERIC_CHUNKS);
    lines
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| {
            let quotes = chunk
                .iter()
                .take(QUOTES_PER_THEME)
                .map(|q| q.to_string())
                .collect();
            Theme::new(
                format!("Theme {}", i + 1),
                "A group of related feedback items.",
                quotes,
            )
        })
        .collect()
}
