//! Command implementations.

pub mod auto;
pub mod projects;
pub mod submit;
pub mod track;

pub use self::auto::execute_auto;
pub use self::projects::{execute_list, execute_show};
pub use self::submit::{build_job_file, execute_submit};
pub use self::track::{execute_check, execute_watch};

use crate::config::Config;
use crate::error::Result;
use std::time::Duration;
use torx_llm::OpenAiBatchClient;
use torx_store::RecordBackend;

/// Build the batch API client from `[api]` settings.
///
/// Fails without an API key, so only commands that talk to the service
/// should call it.
pub fn connect(config: &Config) -> Result<OpenAiBatchClient> {
    Ok(OpenAiBatchClient::with_base_url(
        &config.api.base_url,
        config.api_key()?,
        Duration::from_secs(config.api.timeout_secs),
    )?)
}

/// Open the configured record store.
pub(crate) fn open_store(config: &Config) -> Result<RecordBackend> {
    tracing::debug!("Opening {}", RecordBackend::describe(&config.storage));
    Ok(RecordBackend::open(&config.storage)?)
}
