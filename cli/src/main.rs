//! agentctl — deployment and orchestration CLI for the intelligent-agent service

use clap::Parser;

use agentctl_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
