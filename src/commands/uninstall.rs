//! `splunkctl uninstall` — stop the server and delete the installation.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};

/// Run `splunkctl uninstall`.
///
/// # Errors
///
/// Returns stop and deletion errors; prompting failures surface when no TTY
/// is available and `--yes` was not passed.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
) -> Result<()> {
    if !instance.is_installed().await {
        app.output.info("Nothing to uninstall.");
        return Ok(());
    }
    let prompt = format!(
        "Remove the installation at {}?",
        instance.install_root().display()
    );
    if !app.confirm(&prompt, false)? {
        app.output.info("Aborted.");
        return Ok(());
    }
    instance.uninstall().await?;
    app.output.success("splunk has been uninstalled");
    Ok(())
}
