use std::path::{Path, PathBuf};

pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Paths and filters for one manifest build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Web root; hrefs are relative to it.
    pub public_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub out_path: PathBuf,
    pub overrides_path: PathBuf,
    pub extension: String,
}

impl BuildConfig {
    /// Layout used by the site: `<public>/reports` holding the PDFs,
    /// `manifest.json` and `overrides.json`.
    pub fn for_public_dir(public_dir: impl AsRef<Path>) -> Self {
        let public_dir = public_dir.as_ref().to_path_buf();
        let reports_dir = public_dir.join("reports");
        Self {
            out_path: reports_dir.join("manifest.json"),
            overrides_path: reports_dir.join("overrides.json"),
            reports_dir,
            public_dir,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Fill unset paths from the reports directory.
    pub fn resolve(
        public_dir: PathBuf,
        reports_dir: Option<PathBuf>,
        out_path: Option<PathBuf>,
        overrides_path: Option<PathBuf>,
        extension: Option<String>,
    ) -> Self {
        let reports_dir = reports_dir.unwrap_or_else(|| public_dir.join("reports"));
        Self {
            out_path: out_path.unwrap_or_else(|| reports_dir.join("manifest.json")),
            overrides_path: overrides_path.unwrap_or_else(|| reports_dir.join("overrides.json")),
            extension: extension
                .map(|e| e.trim_start_matches('.').to_string())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            reports_dir,
            public_dir,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::for_public_dir(DEFAULT_PUBLIC_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_site_layout() {
        let config = BuildConfig::default();
        assert_eq!(config.reports_dir, PathBuf::from("public/reports"));
        assert_eq!(config.out_path, PathBuf::from("public/reports/manifest.json"));
        assert_eq!(
            config.overrides_path,
            PathBuf::from("public/reports/overrides.json")
        );
        assert_eq!(config.extension, "pdf");
    }

    #[test]
    fn explicit_reports_dir_moves_derived_files() {
        let config = BuildConfig::resolve(
            PathBuf::from("site"),
            Some(PathBuf::from("site/docs")),
            None,
            None,
            Some(".PDF".to_string()),
        );
        assert_eq!(config.out_path, PathBuf::from("site/docs/manifest.json"));
        assert_eq!(config.overrides_path, PathBuf::from("site/docs/overrides.json"));
        assert_eq!(config.extension, "PDF");
    }
}
