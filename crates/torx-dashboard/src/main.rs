//! Torx Dashboard server
//!
//! Serves the project viewer over the configured storage.

use std::env;
use std::path::PathBuf;
use std::process;
use torx_dashboard::{config::DashboardConfig, start_server, DashboardError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), DashboardError> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 2 && args[1] == "--config" {
        Some(PathBuf::from(&args[2]))
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        return Ok(());
    } else {
        None
    };

    let config = DashboardConfig::load(config_path.as_deref())?;
    start_server(config).await
}

fn print_help() {
    println!("Torx Dashboard - TOR document extraction viewer");
    println!();
    println!("USAGE:");
    println!("    torx-dashboard [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file (default: ./torx.toml)");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    [dashboard] bind_address, bind_port (default 127.0.0.1:8501)");
    println!("    [storage]   mode (sqlite|files), db_path, output_dir");
    println!();
    println!("ENVIRONMENT:");
    println!("    TORX_DB     Override the SQLite database path");
    println!("    RUST_LOG    Log filter (default: info)");
}
