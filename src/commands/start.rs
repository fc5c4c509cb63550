//! `splunkctl start` — start the server and report the discovered ports.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};

/// Run `splunkctl start`.
///
/// # Errors
///
/// Returns an error when the server is not installed or did not come up.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
    auto_ports: bool,
) -> Result<()> {
    app.output.info("Starting splunk...");
    instance.start(auto_ports).await?;
    app.output.success("splunk is running");
    if let Some(port) = instance.splunkd_port().await {
        app.output.kv("splunkd port", &port.to_string());
    }
    if let Some(port) = instance.web_port().await {
        app.output.kv("web port   ", &port.to_string());
    }
    Ok(())
}
