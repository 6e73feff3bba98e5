//! CLI command definitions
//!
//! Defines the clap commands for the journey CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a journey scenario against the configured WebDriver endpoint
    Run {
        /// Path to the scenario YAML file
        scenario: PathBuf,

        /// Path to a configuration file (default: the platform config dir)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Execute against the in-memory mock driver instead of a browser
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a scenario file and report its shape without running it
    #[command(alias = "check")]
    Validate {
        /// Path to the scenario YAML file
        scenario: PathBuf,
    },
}
