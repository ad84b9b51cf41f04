//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Torx CLI - Extract bid submission evidence from TOR documents via batch LLM jobs.
#[derive(Debug, Parser)]
#[command(name = "torx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TORX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Numbered menu: submit, check, or auto pilot
    Menu,

    /// Build the job file from the input folder and submit it
    Submit(SubmitArgs),

    /// Check a batch once and save its results if completed
    Check(BatchArgs),

    /// Poll a batch until it finishes and save its results
    Watch(BatchArgs),

    /// Submit, then poll until finished and save the results
    Auto(SubmitArgs),

    /// List stored projects, most recent first
    List(ListArgs),

    /// Show the stored record of one project
    Show(ShowArgs),
}

/// Arguments for building and submitting a job.
#[derive(Debug, Default, Parser)]
pub struct SubmitArgs {
    /// Folder of source documents (overrides config)
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Maximum concurrent extractions (overrides config)
    #[arg(short = 'n', long)]
    pub concurrency: Option<usize>,

    /// Resubmit documents whose project is already stored
    #[arg(long)]
    pub all: bool,
}

/// Arguments for commands that follow an existing batch.
#[derive(Debug, Default, Parser)]
pub struct BatchArgs {
    /// Batch id (defaults to the one in the recovery file)
    #[arg(short, long)]
    pub batch_id: Option<String>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of projects
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Project id (file name without extension)
    pub project_id: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
