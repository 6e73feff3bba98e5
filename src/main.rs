//! Synthetic journey CLI
//!
//! Runs scripted-browser monitoring journeys described by YAML scenario
//! files against a WebDriver endpoint.

use clap::Parser;
use journey::commands::Commands;
use journey::{cli, common};

#[derive(Parser)]
#[command(name = "journey", about = "Scripted-browser synthetic journey runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
