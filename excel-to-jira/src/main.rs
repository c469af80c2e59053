use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::*;

mod config;
mod excel;
mod jira;
mod pipeline;

use jira::JiraClient;
use pipeline::{Pipeline, RunOptions, RunReport};

/// Create Jira issues from the rows of an Excel sheet and link the created
/// keys back into the sheet
#[derive(Parser, Debug)]
#[command(name = "excel-to-jira", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log the requests that would be sent; create nothing, save nothing
    #[arg(long)]
    dry_run: bool,

    /// Skip rows that fail instead of stopping at the first one
    #[arg(long)]
    continue_on_error: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

/// Exit code for an unusable configuration
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // .env may carry credentials and RUST_LOG, so load it before the logger
    let dotenv_path = dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Some(path) = dotenv_path {
        log::debug!("Loaded environment from {}", path.display());
    }

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let options = RunOptions {
        dry_run: cli.dry_run,
        continue_on_error: cli.continue_on_error,
    };

    match run(&config, options).await {
        Ok(report) => {
            print_summary(&report, &config.excel.path, options);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &config::Config, options: RunOptions) -> anyhow::Result<RunReport> {
    let client = JiraClient::new(&config.jira).context("Failed to create HTTP client")?;
    let report = Pipeline::new(config, &client, options)
        .run()
        .await
        .context("Error occurred while creating Jira issues")?;
    Ok(report)
}

fn print_summary(report: &RunReport, path: &std::path::Path, options: RunOptions) {
    println!();
    if options.dry_run {
        println!(
            "{} {} request(s) built, nothing sent",
            "Dry run:".bright_cyan().bold(),
            report.previewed
        );
    } else {
        println!(
            "{} {} issue(s) created",
            "Done:".bright_green().bold(),
            report.created.len()
        );
        for created in &report.created {
            println!("  row {:>4}  {}  {}", created.row, created.key.bold(), created.url.dimmed());
        }
    }

    if !report.failures.is_empty() {
        println!("{} {} row(s) failed", "Failed:".bright_red().bold(), report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure.to_string().red());
        }
    }
    if report.aborted {
        println!("{}", "Stopped at the first failure; later rows were not processed".yellow());
    }

    match &report.persist_error {
        Some(e) => println!("{} {}", "Could not save workbook:".bright_red().bold(), e),
        None if !options.dry_run => println!("Workbook saved: {}", path.display().to_string().cyan()),
        None => {}
    }
}
