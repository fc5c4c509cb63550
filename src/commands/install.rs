//! `splunkctl install` — install from an archive, a URL, or a package
//! channel.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};
use crate::domain::config::Defaults;
use crate::infra::archiver::TarArchiver;
use crate::infra::resolver::{self, HttpPackageResolver};

#[derive(Args)]
pub struct InstallArgs {
    /// Archive path or URL to install from
    #[arg(value_name = "ARCHIVE|URL", conflicts_with_all = ["nightly", "release"])]
    pub source: Option<String>,

    /// Install a nightly build
    #[arg(long, conflicts_with = "release")]
    pub nightly: bool,

    /// Install a published release
    #[arg(long)]
    pub release: bool,

    /// Nightly branch (default: current)
    #[arg(long, requires = "nightly")]
    pub branch: Option<String>,

    /// Nightly build number (default: latest)
    #[arg(long, requires = "nightly")]
    pub build: Option<String>,

    /// Release version (default: latest)
    #[arg(long = "package-version", requires = "release", value_name = "VERSION")]
    pub package_version: Option<String>,

    /// Install the universal forwarder instead of the full product
    #[arg(long)]
    pub forwarder: bool,

    /// Base URL packages are resolved against
    #[arg(long, env = "SPLUNK_PACKAGE_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,
}

/// Run `splunkctl install`.
///
/// # Errors
///
/// Returns resolution, download, extraction, and relocation errors.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
    args: InstallArgs,
    defaults: &Defaults,
) -> Result<()> {
    let archiver = TarArchiver::new();

    if let Some(source) = &args.source {
        if source.starts_with("http://") || source.starts_with("https://") {
            app.output.info(&format!("Downloading {source}..."));
            let archive = resolver::download_to_temp(source)?;
            instance.install_from_downloaded(&archiver, &archive).await?;
        } else {
            instance
                .install_from_archive(&archiver, Path::new(source))
                .await?;
        }
    } else if args.nightly || args.release {
        let base_url = args
            .base_url
            .clone()
            .or_else(|| defaults.package_base_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no package base URL configured; pass --base-url or set \
                     package_base_url in the config file"
                )
            })?;
        let resolver = HttpPackageResolver::new(base_url);
        let platform = instance.transport().platform().await?;
        app.output.info("Resolving package...");
        match (args.nightly, args.forwarder) {
            (true, false) => {
                instance
                    .install_nightly(&resolver, &archiver, platform, args.branch, args.build)
                    .await?;
            }
            (true, true) => {
                instance
                    .install_nightly_forwarder(
                        &resolver,
                        &archiver,
                        platform,
                        args.branch,
                        args.build,
                    )
                    .await?;
            }
            (false, false) => {
                instance
                    .install_release(&resolver, &archiver, platform, args.package_version)
                    .await?;
            }
            (false, true) => {
                instance
                    .install_released_forwarder(
                        &resolver,
                        &archiver,
                        platform,
                        args.package_version,
                    )
                    .await?;
            }
        }
    } else {
        anyhow::bail!("nothing to install: pass an archive path, a URL, --nightly, or --release");
    }

    app.output
        .success("Install complete. Start it with 'splunkctl start'.");
    Ok(())
}
