//! `splunkctl stop` — stop the server, preserving the installation.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};

/// Run `splunkctl stop`.
///
/// # Errors
///
/// Returns an error when the server is still running after the stop.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
) -> Result<()> {
    if !instance.is_installed().await {
        app.output.info("Nothing to stop — no installation found.");
        return Ok(());
    }
    if !instance.is_running().await {
        app.output.info("splunk is already stopped.");
        return Ok(());
    }
    app.output.info("Stopping splunk...");
    instance.stop().await?;
    app.output.success("splunk stopped");
    Ok(())
}
