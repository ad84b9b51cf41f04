//! List and show command implementations.

use super::open_store;
use crate::cli::{ListArgs, ShowArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use torx_domain::traits::RecordStore;
use torx_domain::ProjectId;

/// Execute the list command.
pub fn execute_list(args: ListArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut projects = open_store(config)?.list_projects()?;
    if let Some(limit) = args.limit {
        projects.truncate(limit);
    }
    println!("{}", formatter.format_projects(&projects)?);
    Ok(())
}

/// Execute the show command.
pub fn execute_show(args: ShowArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let id = ProjectId::new(args.project_id.trim());
    if id.as_str().is_empty() {
        return Err(CliError::InvalidInput("Project id must not be empty".to_string()));
    }

    let record = open_store(config)?
        .get_record(&id)?
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;
    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
