//! splunkctl - control Splunk instances, local or over SSH

use clap::Parser;

use splunkctl::cli::Cli;

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
