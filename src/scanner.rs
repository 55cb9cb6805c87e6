use crate::error::{ManifestError, Result};
use crate::types::ScannedFile;
use chrono::{DateTime, SubsecRound, Utc};
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Walk `reports_dir` and stat every file with the given extension.
///
/// Entries are visited in file-name order so repeated runs see the same
/// sequence. Any walk or stat failure aborts the scan; a partial manifest is
/// never produced.
pub fn scan_documents(
    public_dir: &Path,
    reports_dir: &Path,
    extension: &str,
) -> Result<Vec<ScannedFile>> {
    if !reports_dir.is_dir() {
        return Err(ManifestError::MissingReportsDir(reports_dir.to_path_buf()));
    }
    let public_root = public_dir.canonicalize()?;
    let root = reports_dir.canonicalize()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension(path, extension) {
            continue;
        }
        let meta = entry.metadata()?;
        // Millisecond precision, the same as the manifest stores.
        let modified: DateTime<Utc> = DateTime::<Utc>::from(meta.modified()?).trunc_subsecs(3);
        let href = public_href(&public_root, path)?;
        debug!("Found {} ({} bytes)", href, meta.len());
        files.push(ScannedFile {
            path: path.to_path_buf(),
            file_name: entry.file_name().to_string_lossy().into_owned(),
            href,
            size_bytes: meta.len(),
            modified,
        });
    }

    info!("Found {} .{} files under {}", files.len(), extension, reports_dir.display());
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Site-absolute URL path of a file under the public root, `/` separated on
/// every platform.
pub fn public_href(public_root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(public_root)
        .map_err(|_| ManifestError::OutsidePublicRoot {
            path: path.to_path_buf(),
            root: public_root.to_path_buf(),
        })?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(format!("/{}", segments.join("/")))
}
