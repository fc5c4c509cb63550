//! Defaults-file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::Defaults;

/// Default location of the defaults file.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".splunkctl").join("config.yaml"))
}

/// Load defaults from `path`, or from the default location when `None`.
///
/// An explicitly given file must exist; a missing default file simply yields
/// empty defaults.
///
/// # Errors
///
/// Returns an error when an explicit file is missing or unreadable, or when
/// any file fails to parse.
pub fn load(path: Option<&Path>) -> Result<Defaults> {
    match path {
        Some(explicit) => read(explicit),
        None => match default_path() {
            Some(default) if default.exists() => read(&default),
            _ => Ok(Defaults::default()),
        },
    }
}

fn read(path: &Path) -> Result<Defaults> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
