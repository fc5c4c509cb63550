//! `splunkctl restart` — restart the server in one command.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};

/// Run `splunkctl restart`.
///
/// # Errors
///
/// Returns an error when the server is not installed or did not come back
/// up.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
) -> Result<()> {
    app.output.info("Restarting splunk...");
    instance.restart().await?;
    app.output.success("splunk is running");
    if let Some(port) = instance.splunkd_port().await {
        app.output.kv("splunkd port", &port.to_string());
    }
    Ok(())
}
