//! HTTP package resolution — downloads archives to local temp files.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::PackageResolver;
use crate::domain::package::PackageDescriptor;

/// Resolves package descriptors against an HTTP file server.
///
/// The server layout is `{base_url}/{channel_path}/{file_name}`; see
/// `PackageDescriptor` for how both components are derived.
pub struct HttpPackageResolver {
    base_url: String,
}

impl HttpPackageResolver {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// URL a descriptor resolves to.
    #[must_use]
    pub fn package_url(&self, package: &PackageDescriptor) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            package.channel_path(),
            package.file_name()
        )
    }
}

impl PackageResolver for HttpPackageResolver {
    fn resolve(&self, package: &PackageDescriptor) -> Result<PathBuf> {
        download_to_temp(&self.package_url(package))
    }
}

/// Stream an HTTP response body into a freshly created temp file and return
/// its path. The caller owns the file and is expected to remove it.
///
/// # Errors
///
/// Returns an error on connection, HTTP, or I/O failures; a partially
/// written temp file is removed before the error is returned.
pub fn download_to_temp(url: &str) -> Result<PathBuf> {
    log::info!("downloading {url}");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("downloading {url}"))?;

    let basename = url.rsplit('/').next().unwrap_or("package");
    let (mut file, path) = tempfile::Builder::new()
        .suffix(&format!("-{basename}"))
        .tempfile()
        .context("creating download temp file")?
        .keep()
        .context("persisting download temp file")?;

    let mut reader = response.into_reader();
    if let Err(err) = std::io::copy(&mut reader, &mut file) {
        let _ = std::fs::remove_file(&path);
        return Err(err).with_context(|| format!("writing body of {url}"));
    }
    log::info!("downloaded {url} to {}", path.display());
    Ok(path)
}
