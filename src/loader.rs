use crate::dates::parse_override_date;
use crate::error::Result;
use crate::types::{Manifest, Override, OverrideMatch, RawOverride, RawOverrideFile};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Load the manual overrides that sit next to the reports.
///
/// A missing file means no overrides. A file that does not parse as
/// `{"overrides": [...]}` is reported and also treated as empty, so a typo in
/// the side-file never blocks a build. Declaration order is kept because the
/// first matching entry wins.
pub fn load_overrides(path: &Path) -> Result<Vec<Override>> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No overrides file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    // Bytes, not text: a file that is not UTF-8 is just another invalid JSON file.
    let parsed: RawOverrideFile = match serde_json::from_slice(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Ignoring overrides file {}: {}", path.display(), e);
            return Ok(Vec::new());
        }
    };
    let overrides: Vec<Override> = parsed
        .overrides
        .into_iter()
        .enumerate()
        .filter_map(|(idx, raw)| clean_override(idx, raw))
        .collect();
    debug!("Loaded {} overrides from {}", overrides.len(), path.display());
    Ok(overrides)
}

fn clean_override(idx: usize, raw: RawOverride) -> Option<Override> {
    let matcher = OverrideMatch {
        file: raw.file.as_ref().and_then(text),
        contains: raw.contains.as_ref().and_then(text).map(|s| s.to_lowercase()),
    };
    if matcher.file.is_none() && matcher.contains.is_none() {
        warn!("Override #{} has neither `file` nor `contains`; it can never match", idx);
        return None;
    }

    let date = match raw.date {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = text(&value).and_then(|s| parse_override_date(&s));
            if parsed.is_none() {
                warn!("Override #{}: ignoring unparseable date {}", idx, value);
            }
            parsed
        }
    };

    let featured = match raw.featured {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(b),
        Some(other) => {
            warn!("Override #{}: ignoring non-boolean featured {}", idx, other);
            None
        }
    };

    let pin = match raw.pin {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = parse_pin(&value);
            if parsed.is_none() {
                warn!("Override #{}: ignoring non-integer pin {}", idx, value);
            }
            parsed
        }
    };

    Some(Override {
        matcher,
        date,
        featured,
        pin,
    })
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_pin(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read one spreadsheet tab exported as CSV.
///
/// A missing file is an empty tab. When the header lacks one of `required`
/// the first missing column is reported along with what was found; rows are
/// still read. Rows that fail to deserialize are skipped and counted.
pub fn load_tab<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    if !path.is_file() {
        debug!("Tab {} not found; treating as empty", path.display());
        return Ok(Vec::new());
    }
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    if let Some(missing) = required
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        warn!(
            "Tab {} missing column \"{}\". Got: {}",
            path.display(),
            missing,
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    }

    let mut rows = Vec::new();
    let mut parse_errors = 0usize;
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                parse_errors += 1;
                debug!("Skipping row in {}: {}", path.display(), e);
            }
        }
    }
    if parse_errors > 0 {
        warn!("{} rows skipped in {}", parse_errors, path.display());
    }
    Ok(rows)
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
