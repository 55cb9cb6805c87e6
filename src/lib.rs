//! Build-time tooling for the investor-relations site: the PDF report
//! manifest, listings over it, and briefing fixtures from spreadsheet exports.

pub mod briefing;
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod output;
pub mod query;
pub mod scanner;
pub mod types;
pub mod util;

pub use config::BuildConfig;
pub use error::{ManifestError, Result};
pub use manifest::build_manifest;
pub use types::{DocumentRecord, Manifest};
