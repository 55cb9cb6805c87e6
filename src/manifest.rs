use crate::config::BuildConfig;
use crate::dates::{infer_date, to_iso};
use crate::error::Result;
use crate::loader::load_overrides;
use crate::scanner::scan_documents;
use crate::types::{DocumentRecord, Manifest, Override, ScannedFile};
use crate::util::pretty_title;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use tracing::info;

static FOLDER_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"reports/(\d{4})/").unwrap());

/// Scan the reports directory, apply overrides and rank the result.
pub fn build_manifest(config: &BuildConfig) -> Result<Manifest> {
    let overrides = load_overrides(&config.overrides_path)?;
    let files = scan_documents(&config.public_dir, &config.reports_dir, &config.extension)?;
    Ok(assemble(&files, &overrides, &config.extension))
}

/// Turn scanned files into a ranked manifest. Pure: timestamps come from the
/// scanned entries, never from the clock.
pub fn assemble(files: &[ScannedFile], overrides: &[Override], extension: &str) -> Manifest {
    let mut items: Vec<DocumentRecord> = files
        .iter()
        .map(|file| build_record(file, overrides, extension))
        .collect();
    items.sort_by(compare_records);
    Manifest::new(items)
}

/// First override, in declaration order, that selects this document.
pub fn find_override<'a>(
    overrides: &'a [Override],
    file_name: &str,
    href: &str,
) -> Option<&'a Override> {
    let lower_file = file_name.to_lowercase();
    let lower_href = href.to_lowercase();
    overrides.iter().find(|ov| {
        ov.matcher.file.as_deref() == Some(file_name)
            || ov.matcher.contains.as_deref().is_some_and(|needle| {
                lower_file.contains(needle) || lower_href.contains(needle)
            })
    })
}

pub fn folder_year(href: &str) -> Option<i32> {
    FOLDER_YEAR.captures(href)?.get(1)?.as_str().parse().ok()
}

pub fn build_record(file: &ScannedFile, overrides: &[Override], extension: &str) -> DocumentRecord {
    let title = pretty_title(&file.file_name, extension);
    let folder_year = folder_year(&file.href);
    let inferred = infer_date(&title).or_else(|| infer_date(&file.href));

    let mut date = inferred;
    let mut featured = false;
    let mut pin = None;
    if let Some(ov) = find_override(overrides, &file.file_name, &file.href) {
        if ov.date.is_some() {
            date = ov.date;
        }
        if let Some(f) = ov.featured {
            featured = f;
        }
        if ov.pin.is_some() {
            pin = ov.pin;
        }
        info!(
            "Override applied: {} -> {}{}{}",
            file.file_name,
            ov.date.as_ref().map(to_iso).unwrap_or_else(|| "(no date)".to_string()),
            if featured { " [featured]" } else { "" },
            pin.map(|p| format!(" [pin={p}]")).unwrap_or_default()
        );
    }

    let display = date.unwrap_or(file.modified);
    let content_year = display.year();
    DocumentRecord {
        title,
        year: folder_year.unwrap_or(content_year),
        folder_year,
        href: file.href.clone(),
        size_bytes: file.size_bytes,
        modified: file.modified,
        inferred_iso: inferred,
        display_iso: display,
        content_year,
        featured,
        pin,
    }
}

// Pinned documents first, lowest pin first; unpinned after all of them.
fn pin_rank(pin: Option<i64>) -> (u8, i64) {
    match pin {
        Some(p) => (0, p),
        None => (1, 0),
    }
}

/// Ranking: featured first, then pin ascending, newest display date, title,
/// and finally href so that no two files compare equal.
pub fn compare_records(a: &DocumentRecord, b: &DocumentRecord) -> Ordering {
    b.featured
        .cmp(&a.featured)
        .then_with(|| pin_rank(a.pin).cmp(&pin_rank(b.pin)))
        .then_with(|| b.display_iso.cmp(&a.display_iso))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.href.cmp(&b.href))
}
