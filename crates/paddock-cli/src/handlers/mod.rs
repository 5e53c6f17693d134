//! Command handlers - extracted from main.rs for testability
//!
//! Each handler folds its flags into the project config, runs the library
//! operation and renders the result through the reporter or as JSON.

pub mod config;
pub mod crop;
pub mod drive;
pub mod rotate;
pub mod smoke;
pub mod variants;

pub use config::execute_config;
pub use crop::execute_crop;
pub use drive::execute_drive;
pub use rotate::execute_rotate;
pub use smoke::execute_smoke;
pub use variants::execute_fix_variants;

use crate::error::{CliError, CliResult};
use paddock::{page_url, PaddockConfig};

/// Runtime for the browser scenarios
pub(crate) fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::setup(format!("failed to create runtime: {e}")))
}

/// `file://` URL of the configured game page
pub(crate) fn game_url(config: &PaddockConfig) -> CliResult<String> {
    let page = config.page_path();
    if !page.is_file() {
        return Err(CliError::config(format!(
            "game page not found: {}",
            page.display()
        )));
    }
    Ok(page_url(&page)?)
}
