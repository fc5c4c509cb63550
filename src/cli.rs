//! CLI argument parsing with clap derive.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::application::{ExecutionTransport, Instance};
use crate::commands;
use crate::domain::config::Defaults;
use crate::infra::{self, LocalTransport, RemoteTransport, SshSession};
use crate::output::OutputContext;

/// Control Splunk instances, local or over SSH
#[derive(Parser)]
#[command(
    name = "splunkctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Splunk install root
    #[arg(long, global = true, env = "SPLUNK_HOME", value_name = "PATH")]
    pub splunk_home: Option<PathBuf>,

    /// Display name for this instance
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Reach the instance over SSH at this host
    #[arg(long, global = true, value_name = "HOST")]
    pub ssh_host: Option<String>,

    /// User for the SSH session
    #[arg(long, global = true, value_name = "USER")]
    pub ssh_user: Option<String>,

    /// Identity file for the SSH session
    #[arg(long, global = true, value_name = "FILE")]
    pub ssh_identity: Option<PathBuf>,

    /// Defaults file (default: ~/.splunkctl/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the server
    Start {
        /// Let the server pick free ports when the defaults are taken
        #[arg(long)]
        auto_ports: bool,
    },

    /// Stop the server (preserves the installation)
    Stop,

    /// Restart the server
    Restart,

    /// Show install/run state, version, and ports
    Status,

    /// Install from an archive, URL, or package channel
    Install(commands::install::InstallArgs),

    /// Stop the server and delete the installation
    Uninstall,

    /// Manage apps
    #[command(subcommand)]
    App(commands::app::AppCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            splunk_home,
            name,
            ssh_host,
            ssh_user,
            ssh_identity,
            config,
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run(json);
            return Ok(());
        }

        let defaults = infra::config::load(config.as_deref())?;
        let app = AppContext::new(OutputContext::new(no_color, quiet), yes);

        let splunk_home = splunk_home
            .or_else(|| defaults.splunk_home.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no splunk home given; pass --splunk-home or set splunk_home \
                     in the config file"
                )
            })?;

        match ssh_host.or_else(|| defaults.ssh_host.clone()) {
            Some(host) => {
                let user = ssh_user.or_else(|| defaults.ssh_user.clone());
                let identity = ssh_identity.or_else(|| defaults.ssh_identity.clone());
                let session = SshSession::new(host, user, identity)?;
                let mut instance =
                    build_instance(&splunk_home, RemoteTransport::new(session), name)?;
                dispatch(&app, &mut instance, command, &defaults, json).await
            }
            None => {
                let mut instance = build_instance(&splunk_home, LocalTransport::new(), name)?;
                dispatch(&app, &mut instance, command, &defaults, json).await
            }
        }
    }
}

fn build_instance<T: ExecutionTransport>(
    root: &Path,
    transport: T,
    name: Option<String>,
) -> Result<Instance<T>> {
    let instance = Instance::new(root, transport)?;
    Ok(match name {
        Some(name) => instance.with_name(name),
        None => instance,
    })
}

async fn dispatch<T: ExecutionTransport>(
    app: &AppContext,
    instance: &mut Instance<T>,
    command: Command,
    defaults: &Defaults,
    json: bool,
) -> Result<()> {
    match command {
        Command::Start { auto_ports } => commands::start::run(app, instance, auto_ports).await,
        Command::Stop => commands::stop::run(app, instance).await,
        Command::Restart => commands::restart::run(app, instance).await,
        Command::Status => commands::status::run(app, instance, json).await,
        Command::Install(args) => commands::install::run(app, instance, args, defaults).await,
        Command::Uninstall => commands::uninstall::run(app, instance).await,
        Command::App(command) => commands::app::run(app, instance, command).await,
        Command::Version => {
            commands::version::run(json);
            Ok(())
        }
    }
}
