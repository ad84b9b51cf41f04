//! Torx CLI - Command-line interface for the TOR bid evidence pipeline.

use anyhow::Context;
use clap::Parser;
use torx_cli::commands;
use torx_cli::menu;
use torx_cli::{Cli, Command, Config, Formatter};
use torx_tracker::TokioClock;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Batch API client for commands that talk to the service
fn connect(config: &Config) -> anyhow::Result<torx_llm::OpenAiBatchClient> {
    commands::connect(config).context("Failed to create batch API client")
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command.unwrap_or(Command::Menu) {
        Command::List(args) => commands::execute_list(args, &config, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &config, &formatter)?,
        Command::Menu => {
            let client = connect(&config)?;
            menu::run_menu(&config, &client, TokioClock, &formatter).await?;
        }
        Command::Submit(args) => {
            let client = connect(&config)?;
            commands::execute_submit(args, &config, &client, &formatter)
                .await
                .context("Submission failed")?;
        }
        Command::Check(args) => {
            let client = connect(&config)?;
            commands::execute_check(args, &config, &client, TokioClock, &formatter)
                .await?
                .into_result()?;
        }
        Command::Watch(args) => {
            let client = connect(&config)?;
            commands::execute_watch(args, &config, &client, TokioClock, &formatter)
                .await?
                .into_result()?;
        }
        Command::Auto(args) => {
            let client = connect(&config)?;
            let outcome =
                commands::execute_auto(args, &config, &client, TokioClock, &formatter).await?;
            if let Some(outcome) = outcome {
                outcome.into_result()?;
            }
        }
    }

    Ok(())
}
