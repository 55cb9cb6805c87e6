use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reports directory missing at {}", .0.display())]
    MissingReportsDir(PathBuf),

    #[error("{} is not inside the public root {}", .path.display(), .root.display())]
    OutsidePublicRoot { path: PathBuf, root: PathBuf },
}
