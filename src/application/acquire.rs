//! Package acquisition: resolve a descriptor to a downloaded archive,
//! install it, and always discard the archive afterwards.

use std::path::Path;

use anyhow::Result;

use crate::application::instance::Instance;
use crate::application::ports::{Archiver, ExecutionTransport, PackageResolver};
use crate::domain::package::{Channel, PackageDescriptor, PackageKind, Platform};

impl<T: ExecutionTransport> Instance<T> {
    /// Resolve `package` through the resolver collaborator and install the
    /// resulting archive.
    ///
    /// # Errors
    ///
    /// Resolution failures propagate unchanged; install failures are
    /// returned after the downloaded archive has been cleaned up.
    pub async fn install_from_package(
        &mut self,
        resolver: &impl PackageResolver,
        archiver: &impl Archiver,
        package: &PackageDescriptor,
    ) -> Result<()> {
        log::info!("acquiring package {}", package.file_name());
        let archive = resolver.resolve(package)?;
        self.install_from_downloaded(archiver, &archive).await
    }

    /// Install from an archive this operation owns, removing the file on
    /// every exit path. The removal never masks an install error.
    ///
    /// # Errors
    ///
    /// Propagates [`Instance::install_from_archive`] failures.
    pub async fn install_from_downloaded(
        &mut self,
        archiver: &impl Archiver,
        archive: &Path,
    ) -> Result<()> {
        let result = self.install_from_archive(archiver, archive).await;
        log::info!("removing downloaded package {}", archive.display());
        if let Err(err) = std::fs::remove_file(archive) {
            log::warn!(
                "failed to remove downloaded package {}: {err}",
                archive.display()
            );
        }
        result
    }

    /// Install the latest (or a specific) nightly build.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::install_from_package`].
    pub async fn install_nightly(
        &mut self,
        resolver: &impl PackageResolver,
        archiver: &impl Archiver,
        platform: Platform,
        branch: Option<String>,
        build: Option<String>,
    ) -> Result<()> {
        let package = PackageDescriptor {
            channel: Channel::Nightly { branch, build },
            platform,
            kind: PackageKind::Full,
        };
        self.install_from_package(resolver, archiver, &package).await
    }

    /// Install a nightly universal-forwarder build.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::install_from_package`].
    pub async fn install_nightly_forwarder(
        &mut self,
        resolver: &impl PackageResolver,
        archiver: &impl Archiver,
        platform: Platform,
        branch: Option<String>,
        build: Option<String>,
    ) -> Result<()> {
        let package = PackageDescriptor {
            channel: Channel::Nightly { branch, build },
            platform,
            kind: PackageKind::UniversalForwarder,
        };
        self.install_from_package(resolver, archiver, &package).await
    }

    /// Install the latest (or a specific) release.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::install_from_package`].
    pub async fn install_release(
        &mut self,
        resolver: &impl PackageResolver,
        archiver: &impl Archiver,
        platform: Platform,
        version: Option<String>,
    ) -> Result<()> {
        let package = PackageDescriptor {
            channel: Channel::Released { version },
            platform,
            kind: PackageKind::Full,
        };
        self.install_from_package(resolver, archiver, &package).await
    }

    /// Install a released universal forwarder.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::install_from_package`].
    pub async fn install_released_forwarder(
        &mut self,
        resolver: &impl PackageResolver,
        archiver: &impl Archiver,
        platform: Platform,
        version: Option<String>,
    ) -> Result<()> {
        let package = PackageDescriptor {
            channel: Channel::Released { version },
            platform,
            kind: PackageKind::UniversalForwarder,
        };
        self.install_from_package(resolver, archiver, &package).await
    }
}
