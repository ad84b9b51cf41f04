//! Torx CLI library.
//!
//! Command-line front end for the extraction pipeline: build and submit
//! job files, follow batches, and inspect stored project records.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
