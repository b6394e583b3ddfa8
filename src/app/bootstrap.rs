use std::path::Path;

use crate::app::controller::AppController;
use crate::config::load_api_config;
use crate::error::Result;

/// Entry point used by `main` to assemble the controller from an optional config file.
pub fn controller_from_config(config_path: Option<&Path>) -> Result<AppController> {
    let config = load_api_config(config_path)?;
    Ok(AppController::new(config))
}
