// Utility helpers for titles, forgiving number parsing and console labels.
//
// Anything that turns a raw filename or spreadsheet cell into a display value
// lives here so the manifest and briefing code only deal with typed values.
use chrono::{DateTime, Utc};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

static UNDERSCORES_AND_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_-]+").unwrap());

// Brand words and acronyms restored after the filename is flattened.
static TITLE_CASING: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)bluenord", "BlueNord"),
        (r"(?i)\basa\b", "ASA"),
        (r"(?i)\bbnor\b", "BNOR"),
        (r"(?i)\bdnb\b", "DNB"),
        (r"(?i)\bpareto\b", "Pareto"),
        (r"(?i)\bfy\b", "FY"),
        (r"(?i)\bq([1-4])\b", "Q${1}"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Turn a file name into a display title.
///
/// - Drops a trailing `.{extension}` (case-insensitive).
/// - Replaces runs of `_` and `-` with one space and trims.
/// - Restores brand casing (`BlueNord`, `ASA`, `Q2`, ...).
pub fn pretty_title(file_name: &str, extension: &str) -> String {
    let base = match file_name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(extension) => stem,
        _ => file_name,
    };
    let mut title = UNDERSCORES_AND_DASHES
        .replace_all(base, " ")
        .trim()
        .to_string();
    for (pattern, replacement) in TITLE_CASING.iter() {
        title = pattern.replace_all(&title, *replacement).into_owned();
    }
    title
}

/// Parse a spreadsheet cell into `f64` while being forgiving about
/// formatting issues that are common in exports (commas, spaces, text).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed, non-empty text of an optional cell.
pub fn non_empty(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages (e.g. `1,204 documents`).
    n.to_formatted_string(&Locale::en)
}

/// Human-readable size in 1024-based units, one decimal, starting at KB.
/// Zero bytes has no label.
pub fn human_size(bytes: u64) -> Option<String> {
    if bytes == 0 {
        return None;
    }
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    let mut value = bytes as f64 / 1024.0;
    let mut idx = 0;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    Some(format!("{:.1} {}", value, UNITS[idx]))
}

/// `30 June 2025` style label used in listings.
pub fn date_label(dt: &DateTime<Utc>) -> String {
    dt.format("%-d %B %Y").to_string()
}
