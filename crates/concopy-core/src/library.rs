//! Text helpers for composing clipboard output

use chrono::{DateTime, Datelike, Timelike};

pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";
pub const DEFAULT_TRUNCATE_SUFFIX: &str = "...";

/// Shorten `text` to at most `length` characters, `suffix` included
pub fn truncate(text: &str, length: usize, suffix: &str) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let keep = length.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

pub fn to_markdown_link(text: &str, url: &str) -> String {
    format!("[{}]({})", text, url)
}

/// Format epoch milliseconds (UTC) with `YYYY MM DD HH mm ss` placeholders
///
/// Each placeholder is replaced once, at its first occurrence. Returns `None`
/// for timestamps outside the representable range.
pub fn format_date(timestamp_ms: i64, pattern: &str) -> Option<String> {
    let date = DateTime::from_timestamp_millis(timestamp_ms)?;

    let fields = [
        ("YYYY", date.year().to_string()),
        ("MM", format!("{:02}", date.month())),
        ("DD", format!("{:02}", date.day())),
        ("HH", format!("{:02}", date.hour())),
        ("mm", format!("{:02}", date.minute())),
        ("ss", format!("{:02}", date.second())),
    ];

    Some(
        fields
            .iter()
            .fold(pattern.to_string(), |out, (placeholder, value)| {
                out.replacen(placeholder, value, 1)
            }),
    )
}
