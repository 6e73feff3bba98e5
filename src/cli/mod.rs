//! CLI command handling
//!
//! Dispatches CLI commands: loads configuration, builds the driver, runs
//! or validates scenarios, and formats the verdict.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::driver::mock::MockDriver;
use crate::driver::webdriver::WebDriverBackend;
use crate::journey::{JourneyReport, Runner};
use crate::scenario::{compile, Scenario};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            scenario,
            config,
            dry_run,
        } => run(&scenario, config.as_deref(), dry_run).await,
        Commands::Validate { scenario } => validate(&scenario),
    }
}

async fn run(path: &Path, config_path: Option<&Path>, dry_run: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let scenario = Scenario::load(path)?;
    let steps = compile(&scenario);

    println!(
        "{} {}",
        "Running journey:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(description) = &scenario.description {
        println!("  {}", description.dimmed());
    }

    let result = if dry_run {
        let driver = Arc::new(MockDriver::default());
        Runner::new(driver, config).run(steps).await
    } else {
        let driver = Arc::new(WebDriverBackend::connect(&config.webdriver).await?);
        let result = Runner::new(driver.clone(), config).run(steps).await;
        if let Err(e) = driver.quit().await {
            warn!("Could not end the WebDriver session: {e}");
        }
        result
    };

    finish(result)
}

fn finish(result: Result<JourneyReport>) -> Result<()> {
    match result {
        Ok(report) => {
            println!(
                "\n{} {}",
                "\u{2713}".green().bold(),
                "Journey passed".green().bold()
            );
            println!(
                "  {} step{} across {} categor{}",
                report.steps,
                if report.steps == 1 { "" } else { "s" },
                report.categories.len(),
                if report.categories.len() == 1 { "y" } else { "ies" }
            );
            if !report.optional_failures.is_empty() {
                println!(
                    "  {} optional step failure{} ignored",
                    report.optional_failures.len(),
                    if report.optional_failures.len() == 1 { "" } else { "s" }
                );
            }
            Ok(())
        }
        Err(e) => {
            println!(
                "\n{} {}",
                "\u{2717}".red().bold(),
                "Journey failed".red().bold()
            );
            Err(e)
        }
    }
}

fn validate(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let steps = compile(&scenario);

    println!(
        "{} {} ({} step{})",
        "Scenario OK:".green().bold(),
        scenario.name,
        steps.len(),
        if steps.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
