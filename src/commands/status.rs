//! `splunkctl status` — show install/run state, version, and ports.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};

/// Run `splunkctl status`.
///
/// # Errors
///
/// Returns an error only when JSON serialization fails; probe failures are
/// reported as unknown values.
pub async fn run<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
    json: bool,
) -> Result<()> {
    let installed = instance.is_installed().await;
    let running = installed && instance.is_running().await;
    let version = if installed {
        instance.version().await.ok()
    } else {
        None
    };
    let (splunkd_port, web_port) = if installed {
        (instance.splunkd_port().await, instance.web_port().await)
    } else {
        (None, None)
    };

    if json {
        let payload = serde_json::json!({
            "name": instance.name(),
            "splunk_home": instance.install_root(),
            "host": instance.splunkd_host(),
            "installed": installed,
            "running": running,
            "version": version,
            "splunkd_port": splunkd_port,
            "web_port": web_port,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let ctx = &app.output;
    ctx.header("splunk status");
    if let Some(name) = instance.name() {
        ctx.kv("name        ", name);
    }
    ctx.kv("splunk home ", &instance.install_root().display().to_string());
    ctx.kv("host        ", instance.splunkd_host());
    ctx.kv("installed   ", if installed { "yes" } else { "no" });
    ctx.kv("running     ", if running { "yes" } else { "no" });
    if let Some(version) = &version {
        ctx.kv("version     ", version);
    }
    ctx.kv("splunkd port", &display_port(splunkd_port));
    ctx.kv("web port    ", &display_port(web_port));
    Ok(())
}

fn display_port(port: Option<u16>) -> String {
    port.map_or_else(|| "unknown".to_string(), |p| p.to_string())
}
