//! Interactive numbered menu.

use crate::cli::{BatchArgs, SubmitArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use torx_domain::traits::{BatchService, Clock};

/// Menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Build the job file and submit it
    Submit,
    /// Check the recorded batch once and save results
    Check,
    /// Submit, wait, and save
    Auto,
    /// Leave the menu
    Quit,
}

/// Parse a menu selection.
pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    match line.trim() {
        "1" => Some(MenuChoice::Submit),
        "2" => Some(MenuChoice::Check),
        "3" => Some(MenuChoice::Auto),
        "q" | "quit" | "exit" | "0" => Some(MenuChoice::Quit),
        _ => None,
    }
}

fn print_menu(formatter: &Formatter) {
    println!("{}", formatter.info("Torx - TOR bid evidence extraction"));
    println!("  1) Build job file and submit batch");
    println!("  2) Check batch and save results (uses the recovery file)");
    println!("  3) Auto pilot: submit, wait, and save");
    println!("  q) Quit");
}

/// Run the interactive menu.
pub async fn run_menu<B, C>(
    config: &Config,
    client: &B,
    clock: C,
    formatter: &Formatter,
) -> Result<()>
where
    B: BatchService,
    B::Error: Display,
    C: Clock + Clone,
{
    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    loop {
        print_menu(formatter);
        let line = match editor.readline("torx> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        };

        let result = match parse_choice(&line) {
            Some(MenuChoice::Quit) => break,
            Some(MenuChoice::Submit) => {
                commands::execute_submit(SubmitArgs::default(), config, client, formatter)
                    .await
                    .map(|_| ())
            }
            Some(MenuChoice::Check) => {
                let args = BatchArgs::default();
                commands::execute_check(args, config, client, clock.clone(), formatter)
                    .await
                    .map(|_| ())
            }
            Some(MenuChoice::Auto) => {
                let args = SubmitArgs::default();
                commands::execute_auto(args, config, client, clock.clone(), formatter)
                    .await
                    .map(|_| ())
            }
            None => {
                if !line.trim().is_empty() {
                    eprintln!("{}", formatter.warning(&format!("Unknown choice: {}", line.trim())));
                }
                continue;
            }
        };

        if let Err(e) = result {
            eprintln!("{}", formatter.error(&e.to_string()));
        }
        println!();
    }

    println!("{}", formatter.info("Goodbye!"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), Some(MenuChoice::Submit));
        assert_eq!(parse_choice(" 2 "), Some(MenuChoice::Check));
        assert_eq!(parse_choice("3\n"), Some(MenuChoice::Auto));
        assert_eq!(parse_choice("q"), Some(MenuChoice::Quit));
        assert_eq!(parse_choice("4"), None);
        assert_eq!(parse_choice(""), None);
    }
}
