//! Command implementations.

pub mod build;
pub mod check;
pub mod serve;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use vidmap_core::Config;

/// Load the configuration file, applying a base URL given on the command line.
pub(crate) fn load_config(config_path: &Path, base_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base URL from CLI");
        config.site.base_url = Some(url.to_string());
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
