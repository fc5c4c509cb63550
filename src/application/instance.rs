//! The instance lifecycle controller.
//!
//! An [`Instance`] binds an install root to one execution transport and
//! exposes the uniform lifecycle contract: start, stop, restart, status and
//! port discovery, uninstall. All external actions route through the
//! transport, so none of the logic here depends on whether the installation
//! is local or reached over a remote shell.
//!
//! The control binary's exit code is not a reliable success signal — it can
//! be non-zero when the server is already up, and zero when it failed to
//! bind. Start/stop/restart therefore verify their post-condition with an
//! independent status probe and only fail when that probe disagrees.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ExecOutput, ExecutionTransport};
use crate::domain::error::{CommandFailure, InstanceError};
use crate::domain::splunk::{
    COMMON_FLAGS, RUNNING_TOKEN, SPLUNK_BINARY, SPLUNKD_PORT_COMMAND, WEB_PORT_COMMAND,
    normalize_install_root, parse_port_output,
};

/// Ports observed after a successful start or restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartEvent {
    pub splunkd_port: Option<u16>,
    pub web_port: Option<u16>,
}

/// Opaque handle returned by [`Instance::on_start`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

type StartListener = Box<dyn FnMut(&StartEvent) + Send>;

/// A controllable server installation bound to one execution transport.
///
/// The install root is normalized to an absolute path at construction and
/// never mutated afterwards. Installed/not-installed is re-probed on every
/// operation rather than cached, since the installation can change out of
/// band (another process, a remote operator).
pub struct Instance<T: ExecutionTransport> {
    name: Option<String>,
    install_root: PathBuf,
    transport: T,
    splunkd_port: Option<u16>,
    web_port: Option<u16>,
    listeners: HashMap<ListenerToken, StartListener>,
    next_listener: u64,
}

impl<T: ExecutionTransport> std::fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("install_root", &self.install_root)
            .field("splunkd_port", &self.splunkd_port)
            .field("web_port", &self.web_port)
            .field("listeners", &self.listeners.len())
            .field("next_listener", &self.next_listener)
            .finish()
    }
}

impl<T: ExecutionTransport> Instance<T> {
    /// Create an instance for `install_root` reached through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::InvalidInstallRoot`] for an empty path or
    /// when a relative path cannot be resolved.
    pub fn new(install_root: impl AsRef<Path>, transport: T) -> Result<Self> {
        let install_root = normalize_install_root(install_root.as_ref())?;
        Ok(Self {
            name: None,
            install_root,
            transport,
            splunkd_port: None,
            web_port: None,
            listeners: HashMap::new(),
            next_listener: 0,
        })
    }

    /// Attach a free-form display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Installed / binary resolution ────────────────────────────────────

    /// Whether the control binary exists under the install root.
    pub async fn is_installed(&self) -> bool {
        self.binary_exists(SPLUNK_BINARY).await
    }

    /// Absolute path the control binary resolves to.
    pub async fn splunk_binary(&self) -> PathBuf {
        self.transport.locate(&self.install_root, SPLUNK_BINARY).await
    }

    async fn binary_exists(&self, name: &str) -> bool {
        let path = self.transport.locate(&self.install_root, name).await;
        self.transport.exists(&path).await
    }

    // ── Command execution ────────────────────────────────────────────────

    /// Run a control-binary command with the non-interactive common flags
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::NotInstalled`] when the control binary is
    /// absent, or the transport's error when execution itself fails.
    pub async fn execute(&self, args: &[&str]) -> Result<ExecOutput> {
        let mut full: Vec<&str> = args.to_vec();
        full.extend_from_slice(COMMON_FLAGS);
        self.execute_without_common_flags(&full).await
    }

    /// Run a control-binary command exactly as given.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::execute`].
    pub async fn execute_without_common_flags(&self, args: &[&str]) -> Result<ExecOutput> {
        if !self.is_installed().await {
            return Err(InstanceError::NotInstalled {
                root: self.install_root.clone(),
            }
            .into());
        }
        self.execute_with_binary(SPLUNK_BINARY, args).await
    }

    /// Run an arbitrary binary from the installation.
    ///
    /// `binary` may be relative to `bin/` or an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::BinaryMissing`] when the resolved binary
    /// does not exist.
    pub async fn execute_with_binary(&self, binary: &str, args: &[&str]) -> Result<ExecOutput> {
        let path = self.transport.locate(&self.install_root, binary).await;
        if !self.transport.exists(&path).await {
            return Err(InstanceError::BinaryMissing(path).into());
        }
        let args: Vec<String> = args.iter().map(|&a| a.to_string()).collect();
        self.transport.run(&path, &args).await
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start the server.
    ///
    /// The command's exit code is returned but not trusted: success is
    /// verified by an independent status probe. On success the cached ports
    /// are refreshed and registered listeners are notified.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::CouldNotStart`] (with full command context)
    /// when the probe reports not-running afterwards.
    pub async fn start(&mut self, auto_ports: bool) -> Result<i32> {
        log::info!("starting splunk at {}", self.install_root.display());
        let mut args = vec!["start"];
        if auto_ports {
            args.push("--auto-ports");
        }
        let output = self.execute(&args).await?;
        if let Err(failure) = self.verify_state(&args, &output, true).await {
            return Err(InstanceError::CouldNotStart(failure).into());
        }
        self.splunk_started().await;
        Ok(output.code)
    }

    /// Stop the server, verifying via the status probe that it is down.
    ///
    /// Idempotent: stopping an already stopped server succeeds, whatever
    /// exit code the tool returns.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::CouldNotStop`] when the probe still reports
    /// running afterwards.
    pub async fn stop(&mut self) -> Result<i32> {
        log::info!("stopping splunk at {}", self.install_root.display());
        let args = ["stop"];
        let output = self.execute(&args).await?;
        if let Err(failure) = self.verify_state(&args, &output, false).await {
            return Err(InstanceError::CouldNotStop(failure).into());
        }
        Ok(output.code)
    }

    /// Restart the server with a single `restart` command (not a
    /// stop-then-start pair), then verify and run the post-start hook.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::CouldNotRestart`] when the probe reports
    /// not-running afterwards.
    pub async fn restart(&mut self) -> Result<i32> {
        log::info!("restarting splunk at {}", self.install_root.display());
        let args = ["restart"];
        let output = self.execute(&args).await?;
        if let Err(failure) = self.verify_state(&args, &output, true).await {
            return Err(InstanceError::CouldNotRestart(failure).into());
        }
        self.splunk_started().await;
        Ok(output.code)
    }

    /// Whether the server process is up. Never errors: not installed, a
    /// failed probe, and a missing running token all read as not running.
    pub async fn is_running(&self) -> bool {
        if !self.is_installed().await {
            return false;
        }
        match self.execute(&["status"]).await {
            Ok(output) => output.stdout_lossy().contains(RUNNING_TOKEN),
            Err(_) => false,
        }
    }

    /// Stop the server only when it is currently running.
    ///
    /// # Errors
    ///
    /// Propagates [`Instance::stop`] failures.
    pub async fn stop_if_running(&mut self) -> Result<()> {
        if self.is_running().await {
            self.stop().await?;
        }
        Ok(())
    }

    /// Version string reported by the installation, e.g.
    /// `Splunk 9.2.1 (build 78803f243968)`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::CommandFailed`] with full command context
    /// when the version query exits non-zero.
    pub async fn version(&self) -> Result<String> {
        let args = ["version"];
        let output = self.execute(&args).await?;
        if !output.success() {
            return Err(InstanceError::CommandFailed(self.failure(&args, &output)).into());
        }
        Ok(output.stdout_lossy().trim().to_string())
    }

    /// Shared post-condition probe: the single source of truth for whether
    /// a lifecycle command actually worked.
    async fn verify_state(
        &self,
        args: &[&str],
        output: &ExecOutput,
        expect_running: bool,
    ) -> Result<(), CommandFailure> {
        if self.is_running().await == expect_running {
            return Ok(());
        }
        Err(self.failure(args, output))
    }

    fn failure(&self, args: &[&str], output: &ExecOutput) -> CommandFailure {
        CommandFailure {
            command: self.command_line(args),
            code: output.code,
            stdout: output.stdout_lossy().into_owned(),
            stderr: output.stderr_lossy().into_owned(),
        }
    }

    /// Display form of a command as [`Instance::execute`] would run it.
    fn command_line(&self, args: &[&str]) -> String {
        let mut words: Vec<&str> = vec![SPLUNK_BINARY];
        words.extend_from_slice(args);
        words.extend_from_slice(COMMON_FLAGS);
        words.join(" ")
    }

    // ── Ports ────────────────────────────────────────────────────────────

    /// The splunkd (management) port; `None` when unknown.
    ///
    /// Lazily discovered on first read and cached until the next
    /// start/restart.
    pub async fn splunkd_port(&mut self) -> Option<u16> {
        if self.splunkd_port.is_none() {
            self.refresh_ports().await;
        }
        self.splunkd_port
    }

    /// The web port; `None` when unknown. Same caching as
    /// [`Instance::splunkd_port`].
    pub async fn web_port(&mut self) -> Option<u16> {
        if self.web_port.is_none() {
            self.refresh_ports().await;
        }
        self.web_port
    }

    /// Re-read both ports from the installation, replacing the caches.
    pub async fn refresh_ports(&mut self) {
        self.splunkd_port = self.read_port(SPLUNKD_PORT_COMMAND).await;
        self.web_port = self.read_port(WEB_PORT_COMMAND).await;
    }

    async fn read_port(&self, query: &str) -> Option<u16> {
        if !self.is_installed().await {
            return None;
        }
        let output = self.execute(&[query]).await.ok()?;
        if !output.success() {
            return None;
        }
        parse_port_output(&output.stdout_lossy())
    }

    #[must_use]
    pub fn splunkd_host(&self) -> &str {
        self.transport.host()
    }

    #[must_use]
    pub fn web_host(&self) -> &str {
        self.transport.host()
    }

    #[must_use]
    pub fn splunkd_scheme(&self) -> &'static str {
        "https"
    }

    #[must_use]
    pub fn web_scheme(&self) -> &'static str {
        "http"
    }

    /// Base URI of the management interface, or `None` while the splunkd
    /// port is unknown.
    pub async fn uri_base(&mut self) -> Option<String> {
        let port = self.splunkd_port().await?;
        Some(format!(
            "{}://{}:{port}",
            self.splunkd_scheme(),
            self.splunkd_host()
        ))
    }

    // ── Listen ports ─────────────────────────────────────────────────────

    /// Open a receiving port (`enable listen -port N`).
    ///
    /// # Errors
    ///
    /// Propagates execution failures from [`Instance::execute`].
    pub async fn enable_listen(&self, port: u16) -> Result<i32> {
        log::info!("enabling listen port {port}");
        let port = port.to_string();
        let output = self
            .execute(&["enable", "listen", "-port", port.as_str()])
            .await?;
        Ok(output.code)
    }

    /// Close a receiving port (`disable listen -port N`).
    ///
    /// # Errors
    ///
    /// Propagates execution failures from [`Instance::execute`].
    pub async fn disable_listen(&self, port: u16) -> Result<i32> {
        log::info!("disabling listen port {port}");
        let port = port.to_string();
        let output = self
            .execute(&["disable", "listen", "-port", port.as_str()])
            .await?;
        Ok(output.code)
    }

    // ── Uninstall ────────────────────────────────────────────────────────

    /// Stop the server if running, then delete the install root.
    ///
    /// A no-op when not installed — no transport delete is issued.
    ///
    /// # Errors
    ///
    /// Propagates stop failures and transport deletion errors.
    pub async fn uninstall(&mut self) -> Result<()> {
        if !self.is_installed().await {
            log::info!("nothing to uninstall at {}", self.install_root.display());
            return Ok(());
        }
        log::info!("uninstalling splunk at {}", self.install_root.display());
        self.stop_if_running().await?;
        self.transport
            .remove_tree(&self.install_root)
            .await
            .with_context(|| format!("removing install root {}", self.install_root.display()))?;
        self.splunkd_port = None;
        self.web_port = None;
        Ok(())
    }

    // ── Start listeners ──────────────────────────────────────────────────

    /// Register a callback invoked once after every successful start or
    /// restart, with the refreshed ports.
    pub fn on_start<F>(&mut self, listener: F) -> ListenerToken
    where
        F: FnMut(&StartEvent) + Send + 'static,
    {
        let token = ListenerToken(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(token, Box::new(listener));
        token
    }

    /// Deregister a start listener. Returns whether the token was known.
    pub fn remove_on_start(&mut self, token: ListenerToken) -> bool {
        self.listeners.remove(&token).is_some()
    }

    /// Post-start hook: refresh the port caches, then notify listeners.
    async fn splunk_started(&mut self) {
        log::info!("splunk is running");
        self.refresh_ports().await;
        let event = StartEvent {
            splunkd_port: self.splunkd_port,
            web_port: self.web_port,
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }
}

impl<T: ExecutionTransport> fmt::Display for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<splunk name={} home={} host={}>",
            self.name.as_deref().unwrap_or("-"),
            self.install_root.display(),
            self.transport.host()
        )
    }
}
