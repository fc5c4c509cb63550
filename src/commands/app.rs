//! `splunkctl app` — manage apps under the instance's apps directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};
use crate::infra::archiver::TarArchiver;

#[derive(Subcommand)]
pub enum AppCommand {
    /// Check whether an app is installed
    Has {
        /// App name
        name: String,
    },
    /// Install an app package
    Install {
        /// App name
        name: String,
        /// Path to the app package archive
        package: PathBuf,
    },
    /// Remove an app
    Remove {
        /// App name
        name: String,
    },
}

/// Run `splunkctl app`.
///
/// # Errors
///
/// Returns extraction and transport errors from the underlying operations.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &Instance<T>,
    command: AppCommand,
) -> Result<()> {
    let ctx = &app.output;
    match command {
        AppCommand::Has { name } => {
            if instance.has_app(&name).await {
                ctx.success(&format!("app '{name}' is installed"));
            } else {
                ctx.info(&format!("app '{name}' is not installed"));
            }
        }
        AppCommand::Install { name, package } => {
            instance
                .install_app(&TarArchiver::new(), &name, &package)
                .await?;
            ctx.success(&format!("app '{name}' installed"));
            ctx.info("Restart splunk for the app to take effect.");
        }
        AppCommand::Remove { name } => {
            if instance.uninstall_app(&name).await? {
                ctx.success(&format!("app '{name}' removed"));
                ctx.info("Restart splunk for the removal to take effect.");
            } else {
                ctx.info(&format!("app '{name}' is not installed"));
            }
        }
    }
    Ok(())
}
